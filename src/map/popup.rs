use glam::DVec2;

/// A heading and the value shown under it
#[derive(Clone, Debug, PartialEq)]
pub struct PopupSection {
    pub heading: &'static str,
    pub body: String,
}

/// Info box bound to a feature, opened by clicking it
#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    /// Where the popup points, in (lon, lat)
    pub anchor: DVec2,
    pub sections: Vec<PopupSection>,
}

impl Popup {
    pub fn new(anchor: DVec2) -> Self {
        Self {
            anchor,
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, heading: &'static str, body: impl Into<String>) -> Self {
        self.sections.push(PopupSection {
            heading,
            body: body.into(),
        });
        self
    }

    /// Same popup pointing somewhere else
    pub fn anchored_at(&self, anchor: DVec2) -> Self {
        Self {
            anchor,
            ..self.clone()
        }
    }

    /// Plain text, one heading or value per line
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .flat_map(|s| [s.heading, s.body.as_str()])
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format a number the way it reads in the dataset: integers without a fraction
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text() {
        let popup = Popup::new(DVec2::ZERO)
            .section("Name of the State", "Texas")
            .section("Number of Airports", "191");
        assert_eq!(popup.text(), "Name of the State\nTexas\nNumber of Airports\n191");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(32171831.0), "32171831");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0");
    }
}
