//! Effects - side effects declared by the reducer

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current weather for `city`, tagged with its generation
    FetchWeather { request_id: u64, city: String },
    /// Drop the in-flight weather request
    CancelWeatherFetch,
}
