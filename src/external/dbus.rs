use crate::config::BusType;
use log::info;

/// Creates [zbus::Connection]s on first use and hands out clones afterwards.
/// Connections are reference counted internally, so clones share one socket.
pub struct ConnectionFactory {
    system: Option<zbus::Connection>,
    session: Option<zbus::Connection>,
}

impl ConnectionFactory {
    /// No connection is opened until one is requested.
    pub fn new() -> ConnectionFactory {
        ConnectionFactory {
            system: None,
            session: None,
        }
    }

    /// Get a connection to the requested bus
    pub async fn get(&mut self, bus: BusType) -> zbus::Result<zbus::Connection> {
        let slot = match bus {
            BusType::System => &mut self.system,
            BusType::Session => &mut self.session,
        };
        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }
        info!("Connecting to the {} bus", bus);
        let connection = match bus {
            BusType::System => zbus::Connection::system().await?,
            BusType::Session => zbus::Connection::session().await?,
        };
        *slot = Some(connection.clone());
        Ok(connection)
    }
}
