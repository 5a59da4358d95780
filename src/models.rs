use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A degree or category label outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DegreeLevel {
    Light,
    Medium,
    Heavy,
}

impl DegreeLevel {
    pub const ALL: [DegreeLevel; 3] = [DegreeLevel::Light, DegreeLevel::Medium, DegreeLevel::Heavy];

    /// Column index on the squares chart, left to right.
    pub fn rank(self) -> usize {
        match self {
            DegreeLevel::Light => 0,
            DegreeLevel::Medium => 1,
            DegreeLevel::Heavy => 2,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DegreeLevel::Light => "lightblue",
            DegreeLevel::Medium => "blue",
            DegreeLevel::Heavy => "darkblue",
        }
    }

    /// RGB value of [`DegreeLevel::color`].
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            DegreeLevel::Light => (173, 216, 230),
            DegreeLevel::Medium => (0, 0, 255),
            DegreeLevel::Heavy => (0, 0, 139),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DegreeLevel::Light => "Light",
            DegreeLevel::Medium => "Medium",
            DegreeLevel::Heavy => "Heavy",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DegreeLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DegreeLevel::ALL
            .into_iter()
            .find(|level| level.label() == s)
            .ok_or_else(|| ParseLabelError {
                kind: "degree",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Visual Media")]
    VisualMedia,
    Family,
    Friends,
    #[serde(rename = "Surroundings (people/places/things/news)")]
    Surroundings,
    Crisis,
    Random,
    Music,
}

impl Category {
    /// Display order used by the pie chart and every report.
    pub const ALL: [Category; 7] = [
        Category::VisualMedia,
        Category::Family,
        Category::Friends,
        Category::Surroundings,
        Category::Crisis,
        Category::Random,
        Category::Music,
    ];

    pub fn color(self) -> &'static str {
        match self {
            Category::VisualMedia => "yellow",
            Category::Family => "orange",
            Category::Friends => "red",
            Category::Surroundings => "purple",
            Category::Crisis => "pink",
            Category::Random => "green",
            Category::Music => "black",
        }
    }

    /// RGB value of [`Category::color`].
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Category::VisualMedia => (255, 255, 0),
            Category::Family => (255, 165, 0),
            Category::Friends => (255, 0, 0),
            Category::Surroundings => (128, 0, 128),
            Category::Crisis => (255, 192, 203),
            Category::Random => (0, 128, 0),
            Category::Music => (0, 0, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::VisualMedia => "Visual Media",
            Category::Family => "Family",
            Category::Friends => "Friends",
            Category::Surroundings => "Surroundings (people/places/things/news)",
            Category::Crisis => "Crisis",
            Category::Random => "Random",
            Category::Music => "Music",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::VisualMedia => 0,
            Category::Family => 1,
            Category::Friends => 2,
            Category::Surroundings => 3,
            Category::Crisis => 4,
            Category::Random => 5,
            Category::Music => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| ParseLabelError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: String,
    pub feeling: String,
    pub story: String,
    pub category: Category,
    pub degree: DegreeLevel,
}

impl Entry {
    pub fn in_month(&self, month: &str) -> bool {
        self.date.contains(month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub degree: DegreeLevel,
    pub category: Category,
    pub stack_height: f64,
    pub color: &'static str,
    pub border_color: &'static str,
    pub tooltip: Vec<String>,
}

/// Per-category counts, always holding every category in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTally {
    counts: [usize; 7],
}

impl CategoryTally {
    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn share(&self, category: Category) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(category) as f64 / total as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.count(category)))
    }
}

#[derive(Serialize)]
struct TallyRow {
    category: Category,
    count: usize,
    color: &'static str,
}

impl Serialize for CategoryTally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(category, count)| TallyRow {
            category,
            count,
            color: category.color(),
        }))
    }
}
