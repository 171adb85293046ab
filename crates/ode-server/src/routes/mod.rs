pub mod data;
pub mod games;
pub mod toc;
