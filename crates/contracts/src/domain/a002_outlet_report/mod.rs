pub mod aggregate;

pub use aggregate::OutletReport;
