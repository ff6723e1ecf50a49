// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::mpsc::Sender;
use std::thread;
use una_app::PromptRequest;
use una_gateway::Client;
use una_tui::{ConsoleRuntime, GatewayOutcome, InternalEvent};

/// Production runtime: gateway calls go through the blocking HTTP client on a
/// worker thread so the event loop keeps drawing while a request is in
/// flight.
pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ConsoleRuntime for HttpRuntime {
    fn send_prompt(&mut self, request: &PromptRequest) -> Result<String> {
        self.client.send(request)
    }

    fn spawn_send(&mut self, request: PromptRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let action = request.action;
            let result = client.send(&request).map_err(|error| error.to_string());
            let _ = tx.send(InternalEvent::Gateway(GatewayOutcome { action, result }));
        });
        Ok(())
    }
}
