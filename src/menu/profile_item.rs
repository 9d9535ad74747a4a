use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::MenuAction;
use crate::context::Subsystems;
use crate::event::Event;
use crate::platform::ProfileId;
use crate::profile::ProfileDescriptor;
use crate::switch::{SwitchOutcome, SwitchTask};

pub const CONNECTING_STATUS: &str = "Connecting...";

/// Button lifecycle as the host sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Ready,
    Connecting,
    Finishing,
}

/// Menu button that switches to one profile slot.
pub struct ProfileSwitchItem {
    index: usize,
    label: String,
    descriptor: ProfileDescriptor,
    status: String,
    state: ItemState,
    task: Option<SwitchTask>,
    subsystems: Subsystems,
    runtime: Handle,
    events: mpsc::UnboundedSender<Event>,
}

impl ProfileSwitchItem {
    pub fn new(
        index: usize,
        descriptor: ProfileDescriptor,
        subsystems: Subsystems,
        runtime: Handle,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            index,
            label: format!("Profile {}", descriptor.id()),
            status: descriptor.summary().to_string(),
            descriptor,
            state: ItemState::Ready,
            task: None,
            subsystems,
            runtime,
            events,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.descriptor.id()
    }

    pub fn descriptor(&self) -> &ProfileDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    fn report(&mut self, outcome: SwitchOutcome) {
        let notify = &self.subsystems.notifications;
        match outcome {
            SwitchOutcome::Succeeded => {
                self.status = format!("Done! {}", self.descriptor.summary());
                notify.info(&format!(
                    "Using profile {}: {}",
                    self.id(),
                    self.descriptor.summary()
                ));
            }
            SwitchOutcome::Canceled => {
                let reason = outcome.reason().unwrap_or_default().to_string();
                notify.info(&reason);
                warn!("Switch to profile {}: {}", self.id(), reason);
                self.status = reason;
            }
            SwitchOutcome::Failed(reason) => {
                notify.report_error(&format!("Error: {reason}"));
                self.status = reason;
            }
        }
    }
}

impl MenuAction for ProfileSwitchItem {
    fn label(&self) -> &str {
        &self.label
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn on_started(&mut self) {
        if self.state != ItemState::Ready {
            debug!("{}: start ignored while {:?}", self.label, self.state);
            return;
        }

        self.status = CONNECTING_STATUS.to_string();
        let events = self.events.clone();
        let index = self.index;
        self.task = Some(SwitchTask::start(
            &self.runtime,
            self.subsystems.platform.clone(),
            self.id(),
            move || {
                let _ = events.send(Event::SwitchFinished(index));
            },
        ));
        self.state = ItemState::Connecting;
        debug!("{}: Ready -> Connecting", self.label);
    }

    fn on_cancel(&mut self) {
        if self.state != ItemState::Connecting {
            debug!("{}: cancel ignored while {:?}", self.label, self.state);
            return;
        }
        if let Some(task) = &self.task {
            task.request_cancel();
        }
    }

    fn poll(&mut self) -> bool {
        if self.state != ItemState::Connecting {
            return false;
        }
        let finished = self
            .task
            .as_mut()
            .map(|task| task.outcome().is_some())
            .unwrap_or(true);
        if finished {
            self.state = ItemState::Finishing;
            debug!("{}: Connecting -> Finishing", self.label);
        }
        finished
    }

    fn on_finished(&mut self) {
        if self.state != ItemState::Finishing {
            debug!("{}: finish ignored while {:?}", self.label, self.state);
            return;
        }
        let outcome = self
            .task
            .take()
            .and_then(|mut task| task.outcome())
            .unwrap_or_else(|| SwitchOutcome::Failed("switch result missing".into()));
        self.report(outcome);
        self.state = ItemState::Ready;
        debug!("{}: Finishing -> Ready", self.label);
    }

    fn is_busy(&self) -> bool {
        self.state != ItemState::Ready
    }
}
