pub mod auth_service;
pub mod browser_service;
pub mod extractor_service;
pub mod planner_service;
pub mod video_service;
pub mod webdriver_service;
pub mod workspace_service;
