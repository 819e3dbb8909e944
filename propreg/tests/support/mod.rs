//! Shared fixtures: sample records, an in-memory store and a tiny HTTP stub.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use propreg::{
    Boundary, ClientError, DocumentType, PropertyRecord, PropertyType, RecordId, RecordStore, SaleDeedType,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ============ Fixtures ============

pub fn record(id: u64, address: &str, owner: &str) -> PropertyRecord {
    PropertyRecord {
        id: Some(RecordId::from(id)),
        property_type: PropertyType::House,
        extent_in_sq_yds: "200".into(),
        address: address.into(),
        boundary: Boundary::North,
        current_owner_name: owner.into(),
        document_type: DocumentType::SaleDeed,
        sale_deed_type: Some(SaleDeedType::Absolute),
        document_number: format!("SD-{id}"),
        year_of_purchase: "2018".into(),
        seller_name: "Kiran Rao".into(),
        registration_date: NaiveDate::from_ymd_opt(2018, 11, 5).unwrap(),
        registrar_office: "Secunderabad".into(),
    }
}

/// Twelve records; even ids live on Canal Road, odd ids on Temple Street.
pub fn twelve_records() -> Vec<PropertyRecord> {
    (1..=12)
        .map(|i| {
            if i % 2 == 0 {
                record(i, "Canal Road", "Meena Iyer")
            } else {
                record(i, "Temple Street", "Arjun Das")
            }
        })
        .collect()
}

// ============ In-memory store ============

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<PropertyRecord>>,
    pub fail_writes: bool,
    next_id: Mutex<u64>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<PropertyRecord>) -> Self {
        let next = records.len() as u64 + 1;
        Self {
            records: Mutex::new(records),
            fail_writes: false,
            next_id: Mutex::new(next),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<PropertyRecord> {
        self.records.lock().unwrap().clone()
    }

    fn unavailable() -> ClientError {
        ClientError::Status {
            status_code: 503,
            message: "backend unavailable".into(),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<PropertyRecord>, ClientError> {
        Ok(self.snapshot())
    }

    async fn create(&self, record: &PropertyRecord) -> Result<PropertyRecord, ClientError> {
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(1);
        let mut created = record.clone();
        created.id = Some(RecordId::from(*next_id));
        *next_id += 1;
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &RecordId, record: &PropertyRecord) -> Result<PropertyRecord, ClientError> {
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|existing| existing.has_id(id))
            .ok_or_else(|| ClientError::NotFound {
                record_id: Some(id.to_string()),
            })?;
        let mut updated = record.clone();
        updated.id = Some(id.clone());
        *slot = updated.clone();
        Ok(updated)
    }
}

// ============ HTTP stub ============

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub type Responder = dyn Fn(&Captured) -> (u16, String) + Send + Sync;

/// Serves every connection with `respond` and records what it received.
pub struct StubServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Captured>>>,
}

impl StubServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond: Arc<Responder> = Arc::new(respond);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let seen = Arc::clone(&seen);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let _ = serve_one(stream, seen, respond).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    seen: Arc<Mutex<Vec<Captured>>>,
    respond: Arc<Responder>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let body_end = (header_end + content_length).min(buffer.len());
    let body = String::from_utf8_lossy(&buffer[header_end..body_end]).to_string();

    let captured = Captured { method, path, body };
    let (status, payload) = respond(&captured);
    seen.lock().unwrap().push(captured);

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        reason(status),
        payload.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}
