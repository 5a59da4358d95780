use crate::models::{DegreeLevel, Entry, PlotPoint};

/// Starting height of every degree column.
pub const BASE_HEIGHT: f64 = 20.0;
/// Value the running height is subtracted from to place a marker.
pub const CEILING: f64 = 100.0;
/// Height added to a column after each marker.
pub const STEP: f64 = 0.5;
/// Column width used when wrapping tooltip lines.
pub const TOOLTIP_WIDTH: usize = 20;

/// Builds one square marker per entry in `month`, stacked per degree column.
///
/// Points keep the order of `entries`. Each degree keeps its own running
/// height, so markers of the same degree never share a position.
pub fn stack_points(entries: &[Entry], month: &str) -> Vec<PlotPoint> {
    let mut heights = [BASE_HEIGHT; 3];
    let mut points = Vec::new();

    for entry in entries.iter().filter(|entry| entry.in_month(month)) {
        let column = entry.degree.rank();
        let height = heights[column];

        points.push(PlotPoint {
            x: column as f64 + 0.5,
            y: CEILING - height,
            degree: entry.degree,
            category: entry.category,
            stack_height: height,
            color: entry.degree.color(),
            border_color: entry.category.color(),
            tooltip: tooltip_lines(entry),
        });

        heights[column] += STEP;
    }

    points
}

/// Number of points per degree column, in rank order.
pub fn column_sizes(points: &[PlotPoint]) -> [(DegreeLevel, usize); 3] {
    DegreeLevel::ALL.map(|level| {
        let count = points.iter().filter(|point| point.degree == level).count();
        (level, count)
    })
}

pub fn tooltip_lines(entry: &Entry) -> Vec<String> {
    let fields = [
        format!("Date: {}", entry.date),
        format!("Feeling: {}", entry.feeling),
        format!("Story: {}", entry.story),
        format!("Category: {}", entry.category),
    ];

    fields
        .iter()
        .flat_map(|field| wrap(field, TOOLTIP_WIDTH))
        .collect()
}

/// Greedy word wrap. Words wider than `width` are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        if chars.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars.iter());
        current_len += chars.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn entry(date: &str, degree: DegreeLevel, category: Category) -> Entry {
        Entry {
            date: date.to_string(),
            feeling: "sad".to_string(),
            story: "long day".to_string(),
            category,
            degree,
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("3-Jan-24", DegreeLevel::Light, Category::Music),
            entry("5-Jan-24", DegreeLevel::Light, Category::Family),
            entry("2-Feb-24", DegreeLevel::Heavy, Category::Crisis),
        ]
    }

    #[test]
    fn stacks_same_degree_in_one_column() {
        let points = stack_points(&sample(), "Jan");
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|point| point.degree == DegreeLevel::Light));
        assert!(points.iter().all(|point| point.x == 0.5));
        assert_eq!(points[0].stack_height, 20.0);
        assert_eq!(points[1].stack_height, 20.5);
        assert_eq!(points[0].y, 80.0);
        assert_eq!(points[1].y, 79.5);
        assert_eq!(points[0].border_color, "black");
        assert_eq!(points[1].border_color, "orange");
    }

    #[test]
    fn columns_keep_independent_heights() {
        let entries = vec![
            entry("1-Mar-24", DegreeLevel::Heavy, Category::Random),
            entry("2-Mar-24", DegreeLevel::Light, Category::Random),
            entry("3-Mar-24", DegreeLevel::Heavy, Category::Friends),
            entry("4-Mar-24", DegreeLevel::Medium, Category::Friends),
        ];
        let points = stack_points(&entries, "Mar");

        let xs: Vec<f64> = points.iter().map(|point| point.x).collect();
        assert_eq!(xs, vec![2.5, 0.5, 2.5, 1.5]);
        let heights: Vec<f64> = points.iter().map(|point| point.stack_height).collect();
        assert_eq!(heights, vec![20.0, 20.0, 20.5, 20.0]);
        assert_eq!(points[0].color, "darkblue");
    }

    #[test]
    fn heights_strictly_increase_per_degree() {
        let mut entries = Vec::new();
        for day in 1..=9 {
            let degree = DegreeLevel::ALL[day % 3];
            entries.push(entry(&format!("{day}-Jan-24"), degree, Category::Random));
        }
        let points = stack_points(&entries, "");
        assert_eq!(points.len(), entries.len());

        for level in DegreeLevel::ALL {
            let heights: Vec<f64> = points
                .iter()
                .filter(|point| point.degree == level)
                .map(|point| point.stack_height)
                .collect();
            assert!(heights.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn unmatched_month_yields_no_points() {
        assert!(stack_points(&sample(), "Dec").is_empty());
    }

    #[test]
    fn empty_filter_takes_every_entry() {
        let points = stack_points(&sample(), "");
        assert_eq!(points.len(), 3);
        assert_eq!(column_sizes(&points)[2], (DegreeLevel::Heavy, 1));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let entries = sample();
        assert_eq!(stack_points(&entries, "Jan"), stack_points(&entries, "Jan"));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("Story: watched the sunset with old friends", 20);
        assert_eq!(
            lines,
            vec!["Story: watched the", "sunset with old", "friends"]
        );
        assert!(lines.iter().all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn splits_words_longer_than_width() {
        let lines = wrap("Feeling: overwhelmingly-exhausted", 10);
        assert_eq!(lines, vec!["Feeling:", "overwhelmi", "ngly-exhau", "sted"]);
    }

    #[test]
    fn tooltip_covers_all_fields() {
        let lines = tooltip_lines(&sample()[0]);
        assert_eq!(
            lines,
            vec!["Date: 3-Jan-24", "Feeling: sad", "Story: long day", "Category: Music"]
        );
    }
}
