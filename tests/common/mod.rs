//! Shared fixtures: in-memory sinks, trip builders, and a one-shot HTTP
//! stub for exercising the index client without a real server.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use anyhow::{Result, bail};
use serde_json::Value;

use tripflow::index::DocumentSink;
use tripflow::trip::TripRecord;

/// Header line of a real yellow-taxi export. The column names deliberately
/// differ from the canonical field names; the reader must ignore them.
pub const TRIP_HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,\
passenger_count,trip_distance,RatecodeID,store_and_fwd_flag,PULocationID,DOLocationID,\
payment_type,fare_amount,extra,mta_tax,tip_amount,tolls_amount,improvement_surcharge,\
total_amount,congestion_surcharge,airport_fee";

/// One 19-column CSV row with the given distance, fare, tip and zone ids.
pub fn csv_row(distance: &str, fare: &str, tip: &str, pu: &str, dropoff: &str) -> String {
    format!(
        "2,2024-01-01 00:01:00,2024-01-01 00:15:00,1,{distance},1,N,{pu},{dropoff},1,\
         {fare},0.5,0.5,{tip},0.0,0.3,0.0,2.5,0.0"
    )
}

/// A trip record with the fields the pipeline reads set explicitly and
/// filler everywhere else.
pub fn trip(distance: &str, fare: &str, tip: &str, pu: &str, dropoff: &str) -> TripRecord {
    TripRecord {
        vendor_id: "2".into(),
        pickup_datetime: "2024-01-01 00:01:00".into(),
        dropoff_datetime: "2024-01-01 00:15:00".into(),
        passenger_count: "1".into(),
        trip_distance: distance.into(),
        rate_code: "1".into(),
        store_and_fwd_flag: "N".into(),
        pu_location_id: pu.into(),
        do_location_id: dropoff.into(),
        payment_type: "1".into(),
        fare_amount: fare.into(),
        extra: "0.5".into(),
        mta_tax: "0.5".into(),
        tip_amount: tip.into(),
        tolls_amount: "0.0".into(),
        improvement_surcharge: "0.3".into(),
        total_amount: "0.0".into(),
        congestion_surcharge: "2.5".into(),
        airport_fee: "0.0".into(),
    }
}

/// Captures every write so tests can assert on documents and ids.
#[derive(Debug, Default)]
pub struct MemorySink {
    docs: Mutex<Vec<(Option<String>, Value)>>,
}

impl MemorySink {
    pub fn documents(&self) -> Vec<(Option<String>, Value)> {
        self.docs.lock().unwrap().clone()
    }
}

impl DocumentSink for MemorySink {
    fn write(&self, id: Option<&str>, document: &Value) -> Result<()> {
        self.docs
            .lock()
            .unwrap()
            .push((id.map(str::to_string), document.clone()));
        Ok(())
    }
}

/// Fails every write, for exercising the log-and-continue policy.
pub struct FailingSink;

impl DocumentSink for FailingSink {
    fn write(&self, _id: Option<&str>, _document: &Value) -> Result<()> {
        bail!("sink unavailable")
    }
}

/// An address nothing listens on (bound once, then released).
pub fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Serve exactly one HTTP request on a random loopback port, answering
/// with the given status line and JSON body.
pub fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, JoinHandle<Vec<String>>) {
    serve_script(vec![(status, body)])
}

/// Serve a fixed sequence of one-request connections on a random loopback
/// port, answering each with the paired status line and JSON body. The
/// handle yields the request line of every connection, in order, so tests
/// can assert on which endpoints were hit.
pub fn serve_script(
    responses: Vec<(&'static str, &'static str)>,
) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            if let Some(line) = read_request(&mut stream) {
                seen.push(line);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
        seen
    });
    (addr, handle)
}

/// Read one full request, headers plus any Content-Length body, so the
/// client never sees its request connection reset mid-send. Returns the
/// request line, e.g. `PUT /nyc_taxi_trip_data HTTP/1.1`.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let request_line = head.lines().next().unwrap_or("").to_string();
    let content_length = head
        .to_lowercase()
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut body_read = buf.len() - (header_end + 4);
    while body_read < content_length {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        body_read += n;
    }
    Some(request_line)
}
