use crate::error::{constants, ProtocolError, Result};
use crate::protocol::envelope::Packet;
use crate::protocol::message::{Message, MessageKind};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

type HandlerFn = dyn Fn(&Message) -> Result<Message> + Send + Sync + 'static;

/// Request router keyed by message kind.
/// Responses are checked against the request's pairing and carry its id back.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<MessageKind, Box<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register<F>(&self, kind: MessageKind, handler: F) -> Result<()>
    where
        F: Fn(&Message) -> Result<Message> + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string()))?;

        handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    pub fn dispatch(&self, request: &Packet) -> Result<Packet> {
        let kind = request.kind();

        let handlers = self
            .handlers
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;

        let response = handlers
            .get(&kind)
            .ok_or(ProtocolError::UnexpectedMessage)
            .and_then(|handler| handler(&request.message))?;

        if !kind.is_answered_by(response.kind()) {
            debug!(request = %kind, response = %response.kind(), "Handler returned mismatched response");
            return Err(ProtocolError::UnexpectedMessage);
        }

        Ok(Packet {
            request_id: request.request_id,
            message: response,
        })
    }

    pub fn has_handler(&self, kind: MessageKind) -> bool {
        self.handlers
            .read()
            .map(|handlers| handlers.contains_key(&kind))
            .unwrap_or(false)
    }
}
