//! Background task that owns the session and serialises all work on it.
//!
//! The presentation thread never blocks on the network. It sends
//! [`SessionRequest`]s through a [`SessionHandle`] and reads the latest
//! [`SessionView`] whenever it draws.

use conquest_core::CommandGateway;
use conquest_system_interaction::InputEvent;
use glam::Vec2;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::{GameSession, PanelAction, SessionView};

/// Work item delivered to the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionRequest {
    /// Pointer or selection input.
    Input(InputEvent),
    /// Control panel action.
    Panel(PanelAction),
    /// The window was resized.
    Viewport(Vec2),
    /// Stops the driver loop.
    Shutdown,
}

/// Presentation-side end of the driver channels.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    requests: mpsc::UnboundedSender<SessionRequest>,
    views: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Queues a request. Returns `false` once the driver has stopped.
    pub fn send(&self, request: SessionRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Latest published view.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.views.borrow().clone()
    }
}

/// Session owner running on the async runtime.
#[derive(Debug)]
pub struct SessionDriver<G> {
    session: GameSession<G>,
    requests: mpsc::UnboundedReceiver<SessionRequest>,
    views: watch::Sender<SessionView>,
}

/// Wraps a session into a driver and the handle used to talk to it.
pub fn channel<G: CommandGateway>(session: GameSession<G>) -> (SessionDriver<G>, SessionHandle) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(session.view());
    let driver = SessionDriver {
        session,
        requests: request_rx,
        views: view_tx,
    };
    let handle = SessionHandle {
        requests: request_tx,
        views: view_rx,
    };
    (driver, handle)
}

impl<G: CommandGateway> SessionDriver<G> {
    /// Processes requests until a shutdown arrives or every handle is dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            if !self.process(request).await {
                break;
            }
        }
        debug!("session driver stopped");
    }

    async fn process(&mut self, request: SessionRequest) -> bool {
        let command = match request {
            SessionRequest::Input(event) => self.session.input(event),
            SessionRequest::Panel(action) => self.session.panel(action),
            SessionRequest::Viewport(viewport) => {
                self.session.set_viewport(viewport);
                None
            }
            SessionRequest::Shutdown => return false,
        };
        self.publish();

        let Some(command) = command else {
            return true;
        };
        self.session.execute(command).await;
        let keep_running = self.discard_backlog();
        self.publish();
        keep_running
    }

    /// Drops input that queued up while a command was in flight.
    fn discard_backlog(&mut self) -> bool {
        let mut keep_running = true;
        let mut discarded = 0_usize;
        while let Ok(request) = self.requests.try_recv() {
            match request {
                SessionRequest::Viewport(viewport) => self.session.set_viewport(viewport),
                SessionRequest::Shutdown => keep_running = false,
                SessionRequest::Input(_) | SessionRequest::Panel(_) => discarded += 1,
            }
        }
        if discarded > 0 {
            debug!(discarded, "dropped input received while a command was pending");
        }
        keep_running
    }

    fn publish(&self) {
        let _ = self.views.send_replace(self.session.view());
    }
}
