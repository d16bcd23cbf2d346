//! A fake SMTP relay speaking just enough of the protocol for an unencrypted,
//! unauthenticated `smtp://` transport.
//!
//! Recipients in the [`REJECTED_DOMAIN`] are refused at `RCPT TO` with a
//! permanent `550` reply.

use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{info, warn};

pub use crate::resend::REJECTED_DOMAIN;

#[derive(Debug, Clone, Default)]
pub struct FakeSmtp(Arc<Mutex<Vec<ReceivedMessage>>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub from: String,
    pub to: Vec<String>,
    pub data: String,
}

impl FakeSmtp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all messages accepted so far.
    pub fn outbox(&self) -> Vec<ReceivedMessage> {
        self.0.lock().unwrap().clone()
    }

    /// Binds to the given address and accepts connections in a background
    /// task. Returns the address actually bound.
    pub async fn spawn(&self, host: IpAddr, port: u16) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        let addr = listener.local_addr()?;
        let fake = self.clone();
        tokio::spawn(async move { fake.accept_loop(listener).await });
        Ok(addr)
    }

    async fn accept_loop(self, listener: TcpListener) {
        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(err) => {
                    warn!("Failed to accept smtp connection: {err}");
                    continue;
                }
            };
            let fake = self.clone();
            tokio::spawn(async move {
                if let Err(err) = fake.session(stream).await {
                    warn!("smtp session failed: {err:#}");
                }
            });
        }
    }

    async fn session(&self, stream: TcpStream) -> anyhow::Result<()> {
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        write.write_all(b"220 localhost fake smtp ready\r\n").await?;

        let mut message = None::<ReceivedMessage>;
        let mut in_data = false;
        while let Some(line) = lines.next_line().await? {
            if in_data {
                if line == "." {
                    in_data = false;
                    if let Some(message) = message.take() {
                        info!(from = %message.from, to = ?message.to, "accepted message");
                        self.0.lock().unwrap().push(message);
                    }
                    write.write_all(b"250 2.0.0 OK queued\r\n").await?;
                } else if let Some(message) = &mut message {
                    message.data.push_str(&line);
                    message.data.push('\n');
                }
                continue;
            }

            let verb = line
                .split([' ', ':'])
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase();
            let reply = match verb.as_str() {
                "EHLO" | "HELO" => "250 localhost\r\n",
                "MAIL" => {
                    message = Some(ReceivedMessage {
                        from: address(&line),
                        to: Vec::new(),
                        data: String::new(),
                    });
                    "250 2.1.0 OK\r\n"
                }
                "RCPT" => {
                    let recipient = address(&line);
                    if recipient.ends_with(&format!("@{REJECTED_DOMAIN}")) {
                        "550 5.1.1 Mailbox unavailable\r\n"
                    } else {
                        if let Some(message) = &mut message {
                            message.to.push(recipient);
                        }
                        "250 2.1.5 OK\r\n"
                    }
                }
                "DATA" => {
                    in_data = true;
                    "354 End data with <CR><LF>.<CR><LF>\r\n"
                }
                "RSET" => {
                    message = None;
                    "250 2.0.0 OK\r\n"
                }
                "QUIT" => {
                    write.write_all(b"221 2.0.0 Bye\r\n").await?;
                    return Ok(());
                }
                _ => "250 2.0.0 OK\r\n",
            };
            write.write_all(reply.as_bytes()).await?;
        }

        Ok(())
    }
}

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting fake smtp server on {host}:{port}");
    info!("Transport url: smtp://{host}:{port}");
    info!("Recipients in the {REJECTED_DOMAIN:?} domain are rejected");

    FakeSmtp::new().spawn(host, port).await?;
    std::future::pending::<()>().await;
    Ok(())
}

fn address(line: &str) -> String {
    line.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(address, _)| address.to_owned())
        .unwrap_or_default()
}
