mod area_service;

pub use area_service::AreaService;
