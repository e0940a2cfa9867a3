mod area_dto;

pub use area_dto::*;
