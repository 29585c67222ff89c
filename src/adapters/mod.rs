//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hal`          | DigitalIoPort      | embedded-hal GPIO pins   |
//! | `log_sink`     | NotificationPort   | Serial log output        |
//! |                | (logging observer) |                          |
//! | `config_file`  | ConfigPort         | JSON file                |
//! | `time`         | n/a                | ESP32 system timer       |

pub mod config_file;
pub mod hal;
pub mod log_sink;
pub mod time;
