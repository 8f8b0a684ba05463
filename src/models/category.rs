use serde::{Deserialize, Serialize};

/// Accounting class used by the statistics reduction. Meetings and email are
/// neither focus nor distraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryClass {
    Focus,
    Distraction,
    Neutral,
}

/// Closed set of activity categories. `Work` is the fallback for summaries no
/// keyword rule claims.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Code,
    Meeting,
    Documentation,
    Email,
    Browsing,
    Video,
    Social,
    Learning,
    Design,
    Work,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Code => "Code",
            Category::Meeting => "Meeting",
            Category::Documentation => "Documentation",
            Category::Email => "Email",
            Category::Browsing => "Browsing",
            Category::Video => "Video",
            Category::Social => "Social",
            Category::Learning => "Learning",
            Category::Design => "Design",
            Category::Work => "Work",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Code => "💻",
            Category::Meeting => "📞",
            Category::Documentation => "📝",
            Category::Email => "✉️",
            Category::Browsing => "🌐",
            Category::Video => "▶️",
            Category::Social => "💬",
            Category::Learning => "📚",
            Category::Design => "🎨",
            Category::Work => "⚙️",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Code => "#E50914",
            Category::Meeting => "#c41111",
            Category::Documentation => "#E50914",
            Category::Email => "#b81010",
            Category::Browsing => "#8a8a8a",
            Category::Video => "#757575",
            Category::Social => "#666666",
            Category::Learning => "#E50914",
            Category::Design => "#E50914",
            Category::Work => "#E50914",
        }
    }

    pub fn class(&self) -> CategoryClass {
        match self {
            Category::Code
            | Category::Documentation
            | Category::Learning
            | Category::Design
            | Category::Work => CategoryClass::Focus,
            Category::Browsing | Category::Video | Category::Social => {
                CategoryClass::Distraction
            }
            Category::Meeting | Category::Email => CategoryClass::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_matches_serialized_form() {
        let json = serde_json::to_string(&Category::Documentation).unwrap();
        assert_eq!(json, "\"Documentation\"");
        assert_eq!(Category::Documentation.label(), "Documentation");
    }

    #[test]
    fn test_every_category_has_a_class() {
        assert_eq!(Category::Code.class(), CategoryClass::Focus);
        assert_eq!(Category::Work.class(), CategoryClass::Focus);
        assert_eq!(Category::Video.class(), CategoryClass::Distraction);
        assert_eq!(Category::Meeting.class(), CategoryClass::Neutral);
        assert_eq!(Category::Email.class(), CategoryClass::Neutral);
    }

    #[test]
    fn test_icon_and_color_table() {
        let expected = [
            (Category::Code, "💻", "#E50914"),
            (Category::Meeting, "📞", "#c41111"),
            (Category::Documentation, "📝", "#E50914"),
            (Category::Email, "✉️", "#b81010"),
            (Category::Browsing, "🌐", "#8a8a8a"),
            (Category::Video, "▶️", "#757575"),
            (Category::Social, "💬", "#666666"),
            (Category::Learning, "📚", "#E50914"),
            (Category::Design, "🎨", "#E50914"),
            (Category::Work, "⚙️", "#E50914"),
        ];
        for (category, icon, color) in expected {
            assert_eq!(category.icon(), icon);
            assert_eq!(category.color(), color);
        }
    }
}
