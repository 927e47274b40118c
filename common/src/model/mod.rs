pub mod accident;
pub mod claim;
pub mod document;
pub mod injury;
pub mod report;
pub mod supplier;
