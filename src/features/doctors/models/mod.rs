mod doctor;
mod working_hours;

pub use doctor::{Doctor, DoctorCategory, DoctorUpdate, NewDoctor};
pub use working_hours::{TimeWorking, WorkingHours};
