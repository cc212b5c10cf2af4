pub mod ai_dto;
pub mod browser_dto;
