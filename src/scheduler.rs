//! Cooperative main loop.
//!
//! One thread, no preemption. Every tick runs the same fixed-priority
//! sequence; anything it calls blocks until finished.
//!
//! ```text
//! ┌──────────────────────────── tick ────────────────────────────┐
//! │ 1. doorbell edge?        ──▶ AccessController (blocking)     │
//! │ 2. motion level?         ──▶ alert + cooldown sleep          │
//! │ 3. command gate elapsed? ──▶ CommandPoller                   │
//! │ 4. weather gate elapsed? ──▶ fetch, cache, irrigation_pending│
//! │ 5. irrigation_pending?   ──▶ IrrigationController (once)     │
//! │ 6. display gate elapsed? ──▶ render two status rows          │
//! │ 7. yield (short sleep)                                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All mutable loop state lives in [`SchedulerContext`], owned by the
//! [`Scheduler`] and lent to each handler. No locking is needed.

use log::{debug, info, warn};

use crate::app::access::{AccessController, AccessTimings};
use crate::app::commands::CommandPoller;
use crate::app::events::AppEvent;
use crate::app::irrigation::IrrigationController;
use crate::app::platform::{NodeIo, Platform};
use crate::app::ports::{
    ActuatorPort, Clock, ConnectivityPort, SensorPort, ServoChannel, WeatherPort,
};
use crate::app::status::{display_lines, reservoir_percent};
use crate::app::weather::{self, WeatherSnapshot};
use crate::config::NodeConfig;

// ═══════════════════════════════════════════════════════════════
//  Loop state
// ═══════════════════════════════════════════════════════════════

/// Everything the loop remembers between ticks.
///
/// A `None` timestamp means the task has never run, so its gate is open
/// on the first tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerContext {
    pub last_command_poll_ms: Option<u64>,
    pub last_weather_fetch_ms: Option<u64>,
    pub last_display_refresh_ms: Option<u64>,
    /// Set on every fresh snapshot, cleared after one irrigation decision.
    pub irrigation_pending: bool,
    pub weather_snapshot: Option<WeatherSnapshot>,
    /// Last processed chat update id.
    pub command_cursor: i64,
}

/// `true` when more than `interval_ms` has passed since `last_ms`.
pub fn is_due(last_ms: Option<u64>, now_ms: u64, interval_ms: u64) -> bool {
    last_ms.is_none_or(|last| now_ms.saturating_sub(last) > interval_ms)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LoopTimings {
    command_poll_interval_ms: u64,
    weather_interval_ms: u64,
    display_refresh_interval_ms: u64,
    motion_cooldown_ms: u32,
    loop_sleep_ms: u32,
    tank_height_cm: f32,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler<P: Platform> {
    io: NodeIo<P>,
    ctx: SchedulerContext,
    access: AccessController,
    irrigation: IrrigationController,
    poller: CommandPoller,
    timings: LoopTimings,
}

impl<P: Platform> Scheduler<P> {
    pub fn new(config: &NodeConfig, io: NodeIo<P>) -> Self {
        Self {
            io,
            ctx: SchedulerContext::default(),
            access: AccessController::new(AccessTimings::from_config(config)),
            irrigation: IrrigationController::new(config),
            poller: CommandPoller::new(config.tank_height_cm),
            timings: LoopTimings {
                command_poll_interval_ms: config.command_poll_interval_ms,
                weather_interval_ms: config.weather_interval_ms,
                display_refresh_interval_ms: config.display_refresh_interval_ms,
                motion_cooldown_ms: config.motion_cooldown_ms,
                loop_sleep_ms: config.loop_sleep_ms,
                tank_height_cm: config.tank_height_cm,
            },
        }
    }

    /// Bring the node to its resting state: link up, door locked,
    /// outputs off, operator notified.
    pub fn start(&mut self) {
        info!("Scheduler: startup sequence");
        self.io.show("Connecting WiFi", "");
        if !self.io.network.is_connected() {
            if let Err(e) = self.io.network.connect() {
                warn!("Scheduler: WiFi connect failed: {}", e);
            }
        }
        if self.io.network.is_connected() {
            let ip = self
                .io
                .network
                .ip_address()
                .map(|ip| ip.to_string())
                .unwrap_or_default();
            self.io.show("WiFi OK!", &ip);
        } else {
            self.io.show("WiFi Error!", "");
        }

        self.io.actuators.set_servo_angle(ServoChannel::Door, 0);
        self.io.actuators.set_servo_angle(ServoChannel::Valve, 0);
        self.io.sleep_ms(1_000);
        self.io.actuators.all_off();

        self.io.notify("Garden system started successfully!");
        self.io.show("System Ready", "Running");
        self.io.sleep_ms(2_000);
        self.io.emit(&AppEvent::Started);
        info!("Scheduler: ready, waiting for events");
    }

    /// One pass of the priority sequence.
    pub fn tick(&mut self) {
        // 1. Doorbell (highest priority, checked every tick)
        if self.io.sensors.doorbell_pressed() {
            self.access.handle_doorbell(&mut self.io);
        }

        // 2. Motion
        if self.io.sensors.motion_detected() {
            self.motion_alert();
        }

        // 3. Chat commands
        let now = self.io.clock.now_ms();
        if is_due(self.ctx.last_command_poll_ms, now, self.timings.command_poll_interval_ms) {
            if self.io.network.is_connected() {
                self.poller.poll(
                    &mut self.ctx.command_cursor,
                    self.ctx.weather_snapshot.as_ref(),
                    &mut self.io,
                );
            } else {
                debug!("Scheduler: link down, skipping command poll");
            }
            self.ctx.last_command_poll_ms = Some(now);
        }

        // 4. Weather refresh
        let now = self.io.clock.now_ms();
        if is_due(self.ctx.last_weather_fetch_ms, now, self.timings.weather_interval_ms) {
            self.refresh_weather();
            self.ctx.last_weather_fetch_ms = Some(now);
        }

        // 5. Irrigation, once per fresh snapshot
        if self.ctx.irrigation_pending {
            if let Some(snapshot) = self.ctx.weather_snapshot.as_ref() {
                self.irrigation.evaluate(snapshot, &mut self.io);
            }
            self.ctx.irrigation_pending = false;
        }

        // 6. Idle screen
        let now = self.io.clock.now_ms();
        if is_due(self.ctx.last_display_refresh_ms, now, self.timings.display_refresh_interval_ms) {
            self.refresh_display();
            self.ctx.last_display_refresh_ms = Some(now);
        }

        // 7. Yield
        self.io.sleep_ms(self.timings.loop_sleep_ms);
    }

    /// Run forever. Nothing inside a tick is fatal.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn motion_alert(&mut self) {
        warn!("Scheduler: motion detected");
        self.io.emit(&AppEvent::MotionDetected);
        self.io.notify("ALERT: motion detected in the garden!");
        self.io.sleep_ms(self.timings.motion_cooldown_ms);
    }

    fn refresh_weather(&mut self) {
        if !self.io.network.is_connected() {
            debug!("Scheduler: link down, skipping weather fetch");
            return;
        }
        let fetched = self.io.weather.fetch_weather();
        if let Err(e) = &fetched {
            warn!("Weather: fetch failed: {}, keeping last snapshot", e);
            self.io.emit(&AppEvent::WeatherFetchFailed(*e));
        }
        if weather::refresh(&mut self.ctx.weather_snapshot, fetched) {
            if let Some(snapshot) = &self.ctx.weather_snapshot {
                info!("Weather: {}", snapshot);
                self.io.emit(&AppEvent::WeatherUpdated(snapshot.clone()));
            }
            self.ctx.irrigation_pending = true;
        }
    }

    fn refresh_display(&mut self) {
        let local = self.io.sensors.read_climate();
        let distance = self.io.sensors.measure_distance_cm();
        let reservoir = reservoir_percent(distance, self.timings.tank_height_cm);
        let (line1, line2) = display_lines(local, reservoir);
        self.io.show(&line1, &line2);
    }

    // ── Introspection ─────────────────────────────────────────

    pub fn context(&self) -> &SchedulerContext {
        &self.ctx
    }

    pub fn io(&self) -> &NodeIo<P> {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut NodeIo<P> {
        &mut self.io
    }

    pub fn access(&self) -> &AccessController {
        &self.access
    }

    pub fn irrigation(&self) -> &IrrigationController {
        &self.irrigation
    }
}
