//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                    | Connects to                    |
//! |-------------|-------------------------------|--------------------------------|
//! | `hardware`  | ButtonInput                   | GPIO input (embedded-hal)      |
//! |             | RotationSensor                | SPI gyro                       |
//! |             | IndicatorOutput               | GPIO outputs (embedded-hal)    |
//! | `rtos`      | TaskSpawner, TaskDelay        | pthreads / FreeRTOS            |
//! |             | TimerService                  | esp_timer task dispatch        |
//! |             | InterruptLine, ButtonInput    | GPIO ISR service               |
//! | `log_sink`  | EventSink                     | Serial log output              |

pub mod hardware;
pub mod log_sink;
pub mod rtos;
