//! luxnode firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (Sensor+Actuator) (EventSink)    (Config)     (Clock)         │
//! │  MqttAdapter       WifiAdapter                                 │
//! │  (Channel)         (boot-time join)                            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  EMA · Anomaly · Classifier · Link supervisor          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use luxnode::adapters::device_id;
use luxnode::adapters::hardware::HardwareAdapter;
use luxnode::adapters::log_sink::LogEventSink;
use luxnode::adapters::mqtt::MqttAdapter;
use luxnode::adapters::nvs::NvsAdapter;
use luxnode::adapters::time::Esp32TimeAdapter;
use luxnode::adapters::wifi::WifiAdapter;
use luxnode::app::ports::ConfigPort;
use luxnode::app::runner::{self, CancelToken};
use luxnode::app::service::AppService;
use luxnode::config::SystemConfig;
use luxnode::error::Error;
use luxnode::drivers::hw_init;
use luxnode::drivers::led::{GpioOutput, LedDriver};
use luxnode::inference::LogisticClassifier;
use luxnode::pins;
use luxnode::sensors::LdrSensor;

/// Join attempts per round before backing off.
const WIFI_ATTEMPTS_PER_ROUND: u32 = 10;
const WIFI_ROUND_BACKOFF_MS: u32 = 5_000;
/// Cooperative yield between loop iterations.
const LOOP_IDLE_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("luxnode v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("{}, using defaults", Error::from(e));
            SystemConfig::default()
        }
    };

    // ── 4. WiFi (blocks until joined) ─────────────────────────
    let mut wifi = WifiAdapter::new(
        peripherals.modem,
        sysloop,
        Some(nvs_partition),
        &config.wifi_ssid,
        &config.wifi_password,
    )
    .map_err(Error::from)?;
    while let Err(e) = wifi.connect_blocking(WIFI_ATTEMPTS_PER_ROUND) {
        warn!("WiFi: {}, retrying in {} ms", e, WIFI_ROUND_BACKOFF_MS);
        FreeRtos::delay_ms(WIFI_ROUND_BACKOFF_MS);
    }

    // ── 5. Adapters ───────────────────────────────────────────
    let client_id = device_id::client_id(&config.client_id_prefix, &device_id::read_mac());
    let mut hw = HardwareAdapter::new(
        LdrSensor::new(pins::LDR_ADC_CHANNEL, config.adc_max),
        LedDriver::new(GpioOutput::new(pins::LED_GPIO)),
    );
    let mut mqtt = MqttAdapter::new(&config.broker_url());
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 6. Application core ───────────────────────────────────
    let classifier = LogisticClassifier::from_config(&config);
    let mut app = AppService::new(config, classifier, client_id);
    app.start(&mut hw, &mut sink);

    // ── 7. Main loop ──────────────────────────────────────────
    let cancel = CancelToken::new();
    runner::run(&mut app, &mut hw, &mut mqtt, &clock, &mut sink, &cancel, || {
        FreeRtos::delay_ms(LOOP_IDLE_MS)
    });

    drop(wifi);
    Ok(())
}
