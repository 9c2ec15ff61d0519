use crate::models::FilterSet;
use url::form_urlencoded;

pub const DEFAULT_LIMIT: &str = "100";

impl FilterSet {
    /// Filters the form starts with: a limit of 100 and nothing else.
    pub fn defaults() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT.to_string()),
            ..Self::default()
        }
    }

    /// Every field in the order the trips endpoint documents them.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("limit", self.limit.as_deref()),
            ("pickup_hour", self.pickup_hour.as_deref()),
            ("pickup_weekday", self.pickup_weekday.as_deref()),
            ("time_of_day", self.time_of_day.as_deref()),
            ("min_speed", self.min_speed.as_deref()),
            ("max_speed", self.max_speed.as_deref()),
            ("min_distance", self.min_distance.as_deref()),
            ("max_distance", self.max_distance.as_deref()),
        ]
    }

    /// Fields that carry a value. Values are passed through untouched.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| match value {
                Some(value) if !value.is_empty() => Some((name, value)),
                _ => None,
            })
            .collect()
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}
