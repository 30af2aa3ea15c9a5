pub mod cities_form;
pub mod dropdown;
pub mod weather_panel;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use cities_form::{CitiesForm, CitiesFormProps};
pub use dropdown::{Dropdown, DropdownProps};
pub use weather_panel::{readout, WeatherPanel, WeatherPanelProps, ERROR_ICON};
