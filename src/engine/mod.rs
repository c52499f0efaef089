pub mod broadphase;
pub mod narrow;
