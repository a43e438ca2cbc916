use crate::common::types::HalStatus;
use crate::core::config::PowerHintTables;
use crate::core::debounce::{BoostSize, InteractionDebounce};
use crate::core::error::HintError;
use crate::core::feature::TapToWake;
use crate::core::governor::{ALL_PROBE_CORES, BOOT_CORE, Governor, GovernorProbe};
use crate::core::hint::{Feature, HintStatus, PowerHint};
use crate::core::lifecycle::{Category, RefCount, RequestSlot};
use crate::core::metadata::{self, StreamState};
use crate::core::perflock::{NamedActions, PerfLock};
use crate::core::profile::{PowerProfile, ProfileMachine, Transition};
use crate::core::resources::{ResourceRequest, hint_id};
use crate::core::tables::{BoostStyle, ChipTables, LAUNCH_BOOST_MS, Selector, VideoStyle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct ModeState {
    slot: RequestSlot,
    on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sustained,
    Vr,
}

impl Mode {
    fn hint_id(self) -> u32 {
        match self {
            Self::Sustained => hint_id::SUSTAINED_PERF,
            Self::Vr => hint_id::VR_MODE,
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Sustained => Self::Vr,
            Self::Vr => Self::Sustained,
        }
    }
}

/// Interaction, launch, boost and the sustained/VR modes share one lock so
/// entering a mode can cancel the boosts atomically.
#[derive(Debug)]
struct InteractionState {
    debounce: InteractionDebounce,
    launch: RequestSlot,
    cpu_boost: RequestSlot,
    sustained: ModeState,
    vr: ModeState,
}

impl InteractionState {
    fn modes_on(&self) -> bool {
        self.sustained.on || self.vr.on
    }
}

#[derive(Debug, Default)]
struct VideoStream {
    refs: RefCount,
    hint_id: Option<u32>,
}

#[derive(Debug, Default)]
struct VideoState {
    encode: VideoStream,
    decode: VideoStream,
}

#[derive(Debug, Default)]
struct DisplayState {
    hint_sent: bool,
    interactive: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Encode,
    Decode,
}

impl Stream {
    fn category(self) -> Category {
        match self {
            Self::Encode => Category::VideoEncode,
            Self::Decode => Category::VideoDecode,
        }
    }

    fn default_hint_id(self) -> u32 {
        match self {
            Self::Encode => hint_id::VIDEO_ENCODE,
            Self::Decode => hint_id::VIDEO_DECODE,
        }
    }
}

/// Process-wide dispatch context. Every entry point takes `&self` and may be
/// called from any thread.
pub struct PowerHal {
    tables: ChipTables,
    lock: Arc<dyn PerfLock>,
    governor: GovernorProbe,
    actions: NamedActions,
    profile: Mutex<ProfileMachine>,
    interaction: Mutex<InteractionState>,
    video: Mutex<VideoState>,
    display: Mutex<DisplayState>,
    hint_tables: RwLock<PowerHintTables>,
    tap_to_wake: Option<TapToWake>,
}

impl PowerHal {
    pub fn new(tables: ChipTables, lock: Arc<dyn PerfLock>, governor: GovernorProbe) -> Self {
        Self {
            tables,
            lock,
            governor,
            actions: NamedActions::new(),
            profile: Mutex::new(ProfileMachine::new()),
            interaction: Mutex::new(InteractionState {
                debounce: InteractionDebounce::new(),
                launch: RequestSlot::new(Category::Launch),
                cpu_boost: RequestSlot::new(Category::CpuBoost),
                sustained: ModeState {
                    slot: RequestSlot::new(Category::SustainedPerformance),
                    on: false,
                },
                vr: ModeState {
                    slot: RequestSlot::new(Category::VrMode),
                    on: false,
                },
            }),
            video: Mutex::new(VideoState::default()),
            display: Mutex::new(DisplayState::default()),
            hint_tables: RwLock::new(PowerHintTables::default()),
            tap_to_wake: None,
        }
    }

    pub fn with_hint_tables(self, tables: PowerHintTables) -> Self {
        self.reload_hint_tables(tables);
        self
    }

    pub fn with_tap_to_wake(mut self, ttw: TapToWake) -> Self {
        self.tap_to_wake = Some(ttw);
        self
    }

    pub fn tables(&self) -> &ChipTables {
        &self.tables
    }

    pub fn current_profile(&self) -> PowerProfile {
        guard(&self.profile).current()
    }

    pub fn power_hint(&self, hint: PowerHint) -> HintStatus {
        if let PowerHint::SetProfile(id) = hint {
            return self.set_profile(id);
        }

        let profile = self.current_profile();
        if self.tables.gating.blocks(profile) {
            debug!(target: "qpowerhal::hint", "{} skipped in {} profile", hint.name(), profile);
            return HintStatus::Handled;
        }

        match hint {
            PowerHint::Interaction(duration) => self.interaction(duration, Instant::now()),
            PowerHint::Launch(data) => self.launch(data),
            PowerHint::CpuBoost(data) => self.cpu_boost(data),
            PowerHint::VideoEncode(meta) => self.video(Stream::Encode, meta.as_deref()),
            PowerHint::VideoDecode(meta) => self.video(Stream::Decode, meta.as_deref()),
            PowerHint::SustainedPerformance(data) => self.mode(Mode::Sustained, data.is_some_and(|v| v != 0)),
            PowerHint::VrMode(data) => self.mode(Mode::Vr, data.is_some_and(|v| v != 0)),
            PowerHint::SetProfile(_) => HintStatus::NotHandled,
        }
    }

    fn set_profile(&self, id: i32) -> HintStatus {
        let mut profile = guard(&self.profile);
        let result = profile.set(
            id,
            self.tables.supported_profiles,
            |p| self.tables.select(&Selector::Profile(p)),
            self.lock.as_ref(),
            &self.actions,
        );
        match result {
            Ok(Transition::Unchanged) => {
                debug!(target: "qpowerhal::profile", "Profile {} already active", profile.current());
                HintStatus::Handled
            }
            Ok(Transition::Switched { .. }) => HintStatus::Handled,
            Err(e) => {
                warn!(target: "qpowerhal::profile", "{}", e);
                HintStatus::NotHandled
            }
        }
    }

    fn interaction(&self, requested: Option<i32>, now: Instant) -> HintStatus {
        let mut st = guard(&self.interaction);
        if st.modes_on() {
            return HintStatus::Handled;
        }

        let duration_ms = self.tables.debounce.duration_ms(requested);
        if !st.debounce.admit(&self.tables.debounce, now, duration_ms) {
            debug!(target: "qpowerhal::hint", "interaction {}ms covered by previous boost", duration_ms);
            return HintStatus::Handled;
        }

        let size = BoostSize::for_duration(duration_ms);
        let request = self.tables.select(&Selector::Interaction(size));
        self.fire(Category::Interaction, duration_ms, &request)
    }

    /// Timed request with no handle kept.
    fn fire(&self, category: Category, duration_ms: i64, request: &ResourceRequest) -> HintStatus {
        if request.is_empty() {
            return HintStatus::Handled;
        }
        let duration = Duration::from_millis(duration_ms.max(1) as u64);
        let handle = self.lock.acquire(duration, request);
        if !handle.is_valid() {
            warn!(target: "qpowerhal::hint", "{}", HintError::VendorApplyFailure { category: category.as_str() });
            return HintStatus::NotHandled;
        }
        debug!(target: "qpowerhal::hint", "{} {}ms -> {}", category.as_str(), duration_ms, handle);
        HintStatus::Handled
    }

    fn launch(&self, data: Option<i32>) -> HintStatus {
        let mut st = guard(&self.interaction);
        if st.modes_on() {
            return HintStatus::Handled;
        }

        let request = self.tables.select(&Selector::Launch);
        match (self.tables.boost, data) {
            (BoostStyle::Timed, Some(_)) => {
                self.fire(Category::Launch, LAUNCH_BOOST_MS as i64, &request)
            }
            (BoostStyle::Timed, None) => HintStatus::Handled,
            (BoostStyle::Tracked, Some(_)) if st.launch.is_active() => HintStatus::Handled,
            (BoostStyle::Tracked, Some(_)) => {
                match st.launch.apply(self.lock.as_ref(), Duration::from_millis(LAUNCH_BOOST_MS), &request) {
                    Ok(_) => {
                        info!(target: "qpowerhal::hint", "Activity launch hint handled");
                        HintStatus::Handled
                    }
                    Err(e) => {
                        warn!(target: "qpowerhal::hint", "{}", e);
                        HintStatus::NotHandled
                    }
                }
            }
            (BoostStyle::Tracked, None) => {
                st.launch.release(self.lock.as_ref());
                HintStatus::Handled
            }
        }
    }

    /// `data` is in microseconds.
    fn cpu_boost(&self, data: Option<i32>) -> HintStatus {
        let mut st = guard(&self.interaction);
        if st.modes_on() {
            return HintStatus::Handled;
        }

        let duration_ms = data.map(|us| i64::from(us) / 1000).unwrap_or(0);
        let request = self.tables.select(&Selector::CpuBoost);

        match self.tables.boost {
            BoostStyle::Timed if duration_ms > 0 => {
                self.fire(Category::CpuBoost, duration_ms, &request)
            }
            BoostStyle::Timed => HintStatus::from_bool(!self.tables.strict_cpu_boost),
            BoostStyle::Tracked => match data {
                None => {
                    st.cpu_boost.release(self.lock.as_ref());
                    HintStatus::Handled
                }
                Some(_) if duration_ms <= 0 => HintStatus::NotHandled,
                Some(_) if st.cpu_boost.is_active() => HintStatus::Handled,
                Some(_) => {
                    let duration = Duration::from_millis(duration_ms as u64);
                    match st.cpu_boost.apply(self.lock.as_ref(), duration, &request) {
                        Ok(_) => {
                            info!(target: "qpowerhal::hint", "CPU boost hint handled");
                            HintStatus::Handled
                        }
                        Err(e) => {
                            warn!(target: "qpowerhal::hint", "{}", e);
                            HintStatus::NotHandled
                        }
                    }
                }
            },
        }
    }

    fn configured_table(&self, id: u32) -> Result<ResourceRequest, HintError> {
        self.hint_tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .table(id)
            .ok_or(HintError::MissingTable(id))
    }

    fn mode(&self, which: Mode, on: bool) -> HintStatus {
        if !self.tables.modes {
            return HintStatus::NotHandled;
        }

        let lock = self.lock.as_ref();
        let mut st = guard(&self.interaction);
        let InteractionState {
            launch,
            cpu_boost,
            sustained,
            vr,
            ..
        } = &mut *st;
        let (this, other) = match which {
            Mode::Sustained => (sustained, vr),
            Mode::Vr => (vr, sustained),
        };

        if on == this.on {
            return HintStatus::Handled;
        }

        if on {
            let id = if other.on {
                hint_id::VR_MODE_SUSTAINED_PERF
            } else {
                which.hint_id()
            };
            let table = match self.configured_table(id) {
                Ok(t) => t,
                Err(e) => {
                    warn!(target: "qpowerhal::hint", "{}", e);
                    return HintStatus::NotHandled;
                }
            };

            if other.on {
                other.slot.release(lock);
            } else {
                launch.release(lock);
                cpu_boost.release(lock);
            }

            if let Err(e) = this.slot.apply(lock, Duration::ZERO, &table) {
                warn!(target: "qpowerhal::hint", "{}", e);
                return HintStatus::NotHandled;
            }
            this.on = true;
        } else {
            this.slot.release(lock);
            this.on = false;

            if other.on {
                let table = match self.configured_table(which.other().hint_id()) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(target: "qpowerhal::hint", "{}", e);
                        return HintStatus::NotHandled;
                    }
                };
                if let Err(e) = other.slot.apply(lock, Duration::ZERO, &table) {
                    warn!(target: "qpowerhal::hint", "{}", e);
                    return HintStatus::NotHandled;
                }
            }
        }

        info!(
            target: "qpowerhal::hint",
            "sustained={} vr={}",
            st.sustained.on,
            st.vr.on
        );
        HintStatus::Handled
    }

    fn video(&self, stream: Stream, payload: Option<&str>) -> HintStatus {
        let style = self.tables.video;
        let strict = style == VideoStyle::Configured;

        if stream == Stream::Decode && style != VideoStyle::PerGovernor {
            return HintStatus::NotHandled;
        }

        let Some(payload) = payload else {
            debug!(target: "qpowerhal::hint", "{}: no metadata", stream.category().as_str());
            return HintStatus::Handled;
        };

        let meta = match metadata::parse(payload, stream.default_hint_id()) {
            Ok(m) => m,
            Err(e) => {
                warn!(target: "qpowerhal::hint", "{}", e);
                return HintStatus::NotHandled;
            }
        };

        let cores: &[usize] = match style {
            VideoStyle::Interactive => &ALL_PROBE_CORES,
            _ => &BOOT_CORE,
        };
        let governor = match self.governor.probe(cores) {
            Ok(g) => g,
            Err(e) => {
                debug!(target: "qpowerhal::hint", "{}: {}", stream.category().as_str(), e);
                return HintStatus::from_bool(!strict);
            }
        };

        match (meta.state, style) {
            (StreamState::Started, VideoStyle::Interactive) => {
                self.video_start_counted(stream, meta.hint_id, &governor)
            }
            (StreamState::Started, _) => self.video_start(stream, meta.hint_id, &governor),
            (StreamState::Stopped, VideoStyle::Interactive) => self.video_stop_counted(stream),
            (StreamState::Stopped, _) => {
                if self.actions.undo(self.lock.as_ref(), meta.hint_id) {
                    info!(target: "qpowerhal::hint", "{} stop (0x{:X})", stream.category().as_str(), meta.hint_id);
                }
                HintStatus::Handled
            }
            (StreamState::Unknown, _) => HintStatus::from_bool(!strict),
        }
    }

    /// Table to apply for a start, or the status to report without applying.
    fn video_table(&self, stream: Stream, id: u32, governor: &Governor) -> Result<ResourceRequest, HintStatus> {
        let strict = self.tables.video == VideoStyle::Configured;
        let needs_interactive = self.tables.video != VideoStyle::PerGovernor;
        if needs_interactive && !governor.is_interactive() {
            debug!(target: "qpowerhal::hint", "{}: governor {} not tuned", stream.category().as_str(), governor);
            return Err(HintStatus::from_bool(!strict));
        }

        let table = match self.tables.video {
            VideoStyle::Configured => self.configured_table(id),
            VideoStyle::Interactive | VideoStyle::PerGovernor => Ok(match stream {
                Stream::Encode => self.tables.select(&Selector::VideoEncode(governor.clone())),
                Stream::Decode => self.tables.select(&Selector::VideoDecode(governor.clone())),
            }),
        };
        match table {
            Ok(t) if !t.is_empty() => Ok(t),
            Ok(_) => Err(HintStatus::Handled),
            Err(e) => {
                warn!(target: "qpowerhal::hint", "{}", e);
                Err(HintStatus::Handled)
            }
        }
    }

    /// Apply the table for `id` on every start. A repeated start replaces
    /// the earlier request for the same id.
    fn video_start(&self, stream: Stream, id: u32, governor: &Governor) -> HintStatus {
        let table = match self.video_table(stream, id, governor) {
            Ok(t) => t,
            Err(status) => return status,
        };
        if !self.actions.perform(self.lock.as_ref(), id, &table) {
            return HintStatus::NotHandled;
        }
        info!(target: "qpowerhal::hint", "{} start (0x{:X})", stream.category().as_str(), id);
        HintStatus::Handled
    }

    /// Overlapping starts share one request: applied on the first, undone
    /// by the last stop.
    fn video_start_counted(&self, stream: Stream, id: u32, governor: &Governor) -> HintStatus {
        let table = match self.video_table(stream, id, governor) {
            Ok(t) => t,
            Err(status) => return status,
        };

        let mut video = guard(&self.video);
        let entry = match stream {
            Stream::Encode => &mut video.encode,
            Stream::Decode => &mut video.decode,
        };
        if entry.refs.acquire() {
            if !self.actions.perform(self.lock.as_ref(), id, &table) {
                entry.refs.release();
                return HintStatus::NotHandled;
            }
            entry.hint_id = Some(id);
            info!(target: "qpowerhal::hint", "{} start (0x{:X})", stream.category().as_str(), id);
        } else {
            debug!(target: "qpowerhal::hint", "{} refs={}", stream.category().as_str(), entry.refs.get());
        }
        HintStatus::Handled
    }

    fn video_stop_counted(&self, stream: Stream) -> HintStatus {
        let mut video = guard(&self.video);
        let entry = match stream {
            Stream::Encode => &mut video.encode,
            Stream::Decode => &mut video.decode,
        };
        if entry.refs.release()
            && let Some(id) = entry.hint_id.take()
        {
            self.actions.undo(self.lock.as_ref(), id);
            info!(target: "qpowerhal::hint", "{} stop (0x{:X})", stream.category().as_str(), id);
        }
        HintStatus::Handled
    }

    pub fn set_interactive(&self, on: bool) -> HintStatus {
        let mut display = guard(&self.display);
        if !self.tables.display_hints {
            display.interactive = Some(on);
            return HintStatus::Handled;
        }

        let governor = match self.governor.probe(&ALL_PROBE_CORES) {
            Ok(g) => g,
            Err(e) => {
                warn!(target: "qpowerhal::hint", "display: {}", e);
                return HintStatus::Handled;
            }
        };

        if governor.is_interactive() {
            if on {
                self.actions.undo(self.lock.as_ref(), hint_id::DISPLAY_STATE);
                display.hint_sent = false;
            } else if !display.hint_sent {
                let table = self.tables.select(&Selector::DisplayOff);
                display.hint_sent = self.actions.perform(self.lock.as_ref(), hint_id::DISPLAY_STATE, &table);
            }
        }

        display.interactive = Some(on);
        info!(target: "qpowerhal::hint", "Display {}", if on { "on" } else { "off" });
        HintStatus::Handled
    }

    pub fn set_feature(&self, feature: Feature, enabled: bool) -> HintStatus {
        match feature {
            Feature::DoubleTapToWake => match &self.tap_to_wake {
                Some(ttw) => match ttw.set(enabled) {
                    Ok(()) => HintStatus::Handled,
                    Err(e) => {
                        warn!(target: "qpowerhal::feature", "{:#}", e);
                        HintStatus::NotHandled
                    }
                },
                None => {
                    debug!(target: "qpowerhal::feature", "No tap-to-wake node configured");
                    HintStatus::NotHandled
                }
            },
        }
    }

    pub fn reload_hint_tables(&self, tables: PowerHintTables) {
        let count = tables.count();
        *self
            .hint_tables
            .write()
            .unwrap_or_else(PoisonError::into_inner) = tables;
        debug!(target: "qpowerhal::hint", "{} power hint tables loaded", count);
    }

    /// Let the perf-lock drop timed requests that have lapsed.
    pub fn sweep(&self, now: Instant) {
        self.lock.sweep(now);
    }

    pub fn status(&self) -> HalStatus {
        let profile = self.current_profile();
        let (launch_active, cpu_boost_active, sustained, vr) = {
            let st = guard(&self.interaction);
            (
                st.launch.is_active(),
                st.cpu_boost.is_active(),
                st.sustained.on,
                st.vr.on,
            )
        };
        let (encode, decode) = {
            let v = guard(&self.video);
            (v.encode.refs.get(), v.decode.refs.get())
        };
        let (interactive, display_hint_sent) = {
            let d = guard(&self.display);
            (d.interactive, d.hint_sent)
        };

        HalStatus {
            variant: self.tables.variant.to_string(),
            profile: profile.to_string(),
            interactive,
            display_hint_sent,
            launch_active,
            cpu_boost_active,
            sustained_performance: sustained,
            vr_mode: vr,
            video_encode_refs: encode,
            video_decode_refs: decode,
            named_actions: self
                .actions
                .active_ids()
                .into_iter()
                .map(|id| format!("0x{:04X}", id))
                .collect(),
            perflock_active: self.lock.active_count(),
        }
    }

    /// Release every request this context holds.
    pub fn shutdown(&self) {
        let lock = self.lock.as_ref();
        {
            let mut st = guard(&self.interaction);
            st.launch.release(lock);
            st.cpu_boost.release(lock);
            st.sustained.slot.release(lock);
            st.sustained.on = false;
            st.vr.slot.release(lock);
            st.vr.on = false;
        }
        guard(&self.profile).reset(lock, &self.actions);
        *guard(&self.video) = VideoState::default();
        guard(&self.display).hint_sent = false;
        self.actions.undo_all(lock);
        info!(target: "qpowerhal::hint", "All requests released");
    }
}
