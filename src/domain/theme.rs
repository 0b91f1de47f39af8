use serde::Deserialize;

/// Named map style. Purely visual, independent of the search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Streets,
    Emerald,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Streets => Theme::Emerald,
            Theme::Emerald => Theme::Streets,
        }
    }

    pub fn style_url(self) -> &'static str {
        match self {
            Theme::Streets => "asset://styles/mapbox-streets-v7.json",
            Theme::Emerald => "asset://styles/emerald-v7.json",
        }
    }
}
