//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to              |
//! |-------------|----------------|--------------------------|
//! | `hardware`  | SensorPort     | ESP32 ADC1 (LDR)         |
//! |             | ActuatorPort   | ESP32 GPIO (LED)         |
//! | `log_sink`  | EventSink      | Serial log output        |
//! | `mqtt`      | ChannelPort    | ESP-IDF MQTT client      |
//! | `nvs`       | ConfigPort     | NVS / in-memory store    |
//! | `time`      | ClockPort      | ESP32 system timer       |
//! | `wifi`      | (boot only)    | ESP-IDF WiFi STA         |
//! | `device_id` | (boot only)    | eFuse MAC → client id    |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
pub mod wifi;
