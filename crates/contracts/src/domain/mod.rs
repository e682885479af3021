pub mod a001_outlet;
pub mod a002_outlet_report;
