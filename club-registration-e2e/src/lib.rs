//! Drives the HTTP service, either in process through the router or over a real socket.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use club_registration_backend::examples::school;
use club_registration_backend::roster::Roster;
use club_registration_backend::routes::router;
use club_registration_database::models::{Club, Student};
use club_registration_database::{MemoryRosterStore, RosterStore as _};
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt as _, Full};
use hyper_util::rt::TokioIo;
use rand::rngs::StdRng;
use rand::SeedableRng as _;
use serde_json::Value;
use tokio::net::TcpStream;
use tower::ServiceExt as _;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The demo school with two cancellations per student.
pub async fn demo_roster(seed: u64) -> Result<Arc<Roster>> {
    let mut store = MemoryRosterStore::new();
    school::seed(&mut store, 2).await?;
    Ok(Arc::new(Roster::new(store, StdRng::seed_from_u64(seed))))
}

pub async fn roster_from(students: &[Student], clubs: &[Club], seed: u64) -> Result<Arc<Roster>> {
    let mut store = MemoryRosterStore::new();
    for club in clubs {
        store.insert_club(club).await?;
    }
    for student in students {
        store.insert_student(student).await?;
    }
    Ok(Arc::new(Roster::new(store, StdRng::seed_from_u64(seed))))
}

#[must_use]
pub fn student(id: &str, class_name: &str, cancellations_left: i32) -> Student {
    Student {
        id: id.to_owned(),
        name: format!("นักเรียน {id}"),
        student_number: format!("S-{id}"),
        class_name: class_name.to_owned(),
        advisor: "ครูประจำชั้น".to_owned(),
        cancellations_left,
    }
}

#[must_use]
pub fn club(id: &str, max_seats: i32, allowed_grades: &[i32]) -> Club {
    Club {
        id: id.to_owned(),
        name: format!("ชุมนุม {id}"),
        teacher_name: "ครูที่ปรึกษาชุมนุม".to_owned(),
        description: String::new(),
        location: "อาคาร 1".to_owned(),
        category: "ทั่วไป".to_owned(),
        max_seats,
        allowed_grades: allowed_grades.to_vec(),
    }
}

#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// The `error` field of an error response.
    pub fn error_kind(&self) -> Result<String> {
        Ok(self.json()?["error"].as_str().unwrap_or_default().to_owned())
    }
}

pub async fn call(
    roster: &Arc<Roster>,
    method: Method,
    uri: &str,
    body: Option<&Value>,
) -> Result<Reply> {
    let body = body.map(serde_json::to_vec).transpose()?.unwrap_or_default();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))?;

    let response = router(Arc::clone(roster)).oneshot(request).await?;
    let (parts, body) = response.into_parts();
    Ok(Reply {
        status: parts.status,
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: body.collect().await?.to_bytes(),
    })
}

pub async fn get(roster: &Arc<Roster>, uri: &str) -> Result<Reply> {
    call(roster, Method::GET, uri, None).await
}

pub async fn post(roster: &Arc<Roster>, uri: &str, body: &Value) -> Result<Reply> {
    call(roster, Method::POST, uri, Some(body)).await
}

// https://github.com/hyperium/hyper/blob/master/examples/client.rs

/// One plain HTTP/1.1 request against a running server.
pub async fn fetch(address: SocketAddr, method: Method, path: &str, body: Option<&Value>) -> Result<Reply> {
    let stream = TcpStream::connect(address).await?;
    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;
    tokio::task::spawn(async move {
        if let Err(err) = conn.await {
            tracing::warn!("client connection failed: {err}");
        }
    });

    let body = body.map(serde_json::to_vec).transpose()?.unwrap_or_default();
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::HOST, address.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))?;

    let response = sender.send_request(request).await?;
    let (parts, body) = response.into_parts();
    Ok(Reply {
        status: parts.status,
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: body.collect().await?.to_bytes(),
    })
}
