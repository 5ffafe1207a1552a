pub mod cloth;
pub mod obstacle;
pub mod particle;
pub mod scene;
pub mod softbody;
pub mod solver;
pub mod spring;
pub mod topology;
pub mod volume;

pub type V3 = nalgebra::Vector3<f64>;
