//! Per-session JSONL record of selections, bookings and notifications.

use crate::booking::Booking;
use crate::error::BookingError;
use crate::notify::Message;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, mode: &str, receptionist_policy: &str) -> Result<()> {
        self.log(
            "session_start",
            serde_json::json!({
                "mode": mode,
                "receptionist_policy": receptionist_policy,
            }),
        )
    }

    pub fn patient_selected(&mut self, id: u32) -> Result<()> {
        self.log("patient_selected", serde_json::json!({ "id": id }))
    }

    pub fn doctor_selected(&mut self, id: u32) -> Result<()> {
        self.log("doctor_selected", serde_json::json!({ "id": id }))
    }

    pub fn appointment_booked(&mut self, booking: &Booking) -> Result<()> {
        self.log(
            "appointment_booked",
            serde_json::json!({
                "appointment": booking.appointment,
                "patient_id": booking.patient_id,
                "doctor_id": booking.doctor_id,
                "receptionist_id": booking.receptionist_id,
            }),
        )
    }

    pub fn notification(&mut self, message: &Message) -> Result<()> {
        self.log("notification", serde_json::to_value(message)?)
    }

    pub fn booking_error(&mut self, error: &BookingError) -> Result<()> {
        self.log(
            "booking_error",
            serde_json::json!({
                "code": error.code(),
                "message": error.to_string(),
            }),
        )
    }
}
