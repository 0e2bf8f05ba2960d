use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventTarget {
    Node(NodeId),
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ToggleId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SelectId(pub(crate) usize);

/// Engine-side event handlers. Each one is bound to the binding it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    ToggleMirror(ToggleId),
    ToggleActivate(ToggleId),
    ToggleKeyActivate(ToggleId),
    LabelActivate(ToggleId),
    LabelDoubleActivate(ToggleId),
    SuppressSelectStart,
    SelectMirror(SelectId),
    SelectTriggerActivate(SelectId),
    SelectKeyNavigate(SelectId),
    PopupOptionClick(SelectId),
    OutsidePointerDown(SelectId),
    OutsideWheel(SelectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ListenerId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<EventTarget, HashMap<String, Vec<Listener>>>,
    next_id: usize,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event: &str, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.map
            .entry(target)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(Listener { id, handler });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let mut emptied_target = None;
        let mut removed = false;
        for (target, events) in self.map.iter_mut() {
            for listeners in events.values_mut() {
                if let Some(pos) = listeners.iter().position(|listener| listener.id == id) {
                    listeners.remove(pos);
                    removed = true;
                    break;
                }
            }
            if removed {
                events.retain(|_, listeners| !listeners.is_empty());
                if events.is_empty() {
                    emptied_target = Some(*target);
                }
                break;
            }
        }
        if let Some(target) = emptied_target {
            self.map.remove(&target);
        }
        removed
    }

    pub(crate) fn remove_target(&mut self, target: EventTarget) -> usize {
        self.map
            .remove(&target)
            .map(|events| events.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.map
            .values()
            .flat_map(|events| events.values())
            .any(|listeners| listeners.iter().any(|listener| listener.id == id))
    }

    pub(crate) fn get(&self, target: EventTarget, event: &str) -> Vec<Listener> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count_on(&self, target: EventTarget) -> usize {
        self.map
            .get(&target)
            .map(|events| events.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: EventTarget,
    pub(crate) current_target: EventTarget,
    pub(crate) key: Option<Key>,
    pub(crate) bubbles: bool,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: EventTarget) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            key: None,
            bubbles: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub(crate) fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub(crate) fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }
}

/// What a handler asks of the dispatcher once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandlerOutcome {
    Continue,
    PreventDefault,
    // `return false` from a jQuery-style handler.
    PreventAndStop,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) frames: bool,
    pub(crate) bindings: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            frames: true,
            bindings: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnimationPurpose {
    Open,
    Close,
}

#[derive(Debug, Clone)]
pub(crate) struct HeightAnimation {
    pub(crate) id: u64,
    pub(crate) select: SelectId,
    pub(crate) node: NodeId,
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) started_at: i64,
    pub(crate) duration_ms: i64,
    pub(crate) purpose: AnimationPurpose,
}

impl HeightAnimation {
    pub(crate) fn progress_at(&self, now_ms: i64) -> f64 {
        if self.duration_ms <= 0 {
            return 1.0;
        }
        let elapsed = (now_ms - self.started_at).max(0) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    pub(crate) fn height_at(&self, now_ms: i64) -> f64 {
        let eased = swing(self.progress_at(now_ms));
        self.from + (self.to - self.from) * eased
    }

    pub(crate) fn is_finished_at(&self, now_ms: i64) -> bool {
        self.progress_at(now_ms) >= 1.0
    }
}

pub(crate) fn swing(progress: f64) -> f64 {
    0.5 - (progress * std::f64::consts::PI).cos() / 2.0
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) now_ms: i64,
    pub(crate) frame_interval_ms: i64,
    pub(crate) frame_step_limit: usize,
    pub(crate) animations: Vec<HeightAnimation>,
    next_animation_id: u64,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            now_ms: 0,
            frame_interval_ms: 16,
            frame_step_limit: 10_000,
            animations: Vec::new(),
            next_animation_id: 1,
        }
    }
}

impl SchedulerState {
    pub(crate) fn allocate_animation_id(&mut self) -> u64 {
        let id = self.next_animation_id;
        self.next_animation_id += 1;
        id
    }

    pub(crate) fn cancel_animation(&mut self, id: u64) -> Option<HeightAnimation> {
        let pos = self.animations.iter().position(|anim| anim.id == id)?;
        Some(self.animations.remove(pos))
    }
}

/// Viewport box of an element, as the host's layout engine would report it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LayoutState {
    pub(crate) rects: HashMap<NodeId, Rect>,
    pub(crate) body_height: f64,
    pub(crate) option_row_height: f64,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            rects: HashMap::new(),
            body_height: 0.0,
            option_row_height: 24.0,
        }
    }
}

impl LayoutState {
    pub(crate) fn rect(&self, node: NodeId) -> Rect {
        self.rects.get(&node).copied().unwrap_or_default()
    }
}

/// Keyboard keys the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    LineFeed,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Tab,
    Escape,
    Other(u32),
}

impl Key {
    /// Maps a legacy `keyCode`/`which` value.
    pub fn from_code(code: u32) -> Self {
        match code {
            10 => Self::LineFeed,
            13 => Self::Enter,
            32 => Self::Space,
            37 => Self::ArrowLeft,
            38 => Self::ArrowUp,
            39 => Self::ArrowRight,
            40 => Self::ArrowDown,
            9 => Self::Tab,
            27 => Self::Escape,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::LineFeed => 10,
            Self::Enter => 13,
            Self::Space => 32,
            Self::ArrowLeft => 37,
            Self::ArrowUp => 38,
            Self::ArrowRight => 39,
            Self::ArrowDown => 40,
            Self::Tab => 9,
            Self::Escape => 27,
            Self::Other(code) => code,
        }
    }

    pub(crate) fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space | Self::LineFeed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingRef {
    Toggle(ToggleId),
    Select(SelectId),
}

#[derive(Debug, Default)]
pub(crate) struct BindingRegistry {
    pub(crate) attached: HashMap<NodeId, BindingRef>,
    pub(crate) toggles: Vec<ToggleBinding>,
    pub(crate) selects: Vec<SelectBinding>,
}

impl BindingRegistry {
    pub(crate) fn toggle(&self, id: ToggleId) -> Result<&ToggleBinding> {
        self.toggles
            .get(id.0)
            .ok_or_else(|| Error::Runtime(format!("unknown toggle binding {}", id.0)))
    }

    pub(crate) fn select(&self, id: SelectId) -> Result<&SelectBinding> {
        self.selects
            .get(id.0)
            .ok_or_else(|| Error::Runtime(format!("unknown select binding {}", id.0)))
    }

    pub(crate) fn select_mut(&mut self, id: SelectId) -> Result<&mut SelectBinding> {
        self.selects
            .get_mut(id.0)
            .ok_or_else(|| Error::Runtime(format!("unknown select binding {}", id.0)))
    }
}
