// Interface adapters: backend HTTP client, wire shapes, storage and console I/O.

pub mod clients;
pub mod console;
pub mod presenter;
pub mod protocol;
pub mod state;
pub mod storage;
