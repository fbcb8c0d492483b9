mod appointment;
mod booking;
mod cli;
mod config;
mod directory;
mod error;
mod input;
mod notify;
mod roles;
mod seed;
mod transcript;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medbook", about = "Book medical appointments from the console")]
pub struct Args {
    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Seed file with patients, doctors, receptionists and hospitals")]
    pub seed: Option<PathBuf>,

    #[arg(
        long,
        env = "MEDBOOK_RECEPTIONIST_POLICY",
        value_name = "POLICY",
        help = "Receptionist assignment: first, least-loaded, id:<n>"
    )]
    pub receptionist_policy: Option<String>,

    #[arg(long, help = "List all seeded records and exit")]
    pub list: bool,

    #[arg(
        long,
        value_name = "ID",
        requires_all = ["doctor", "appointment_id", "date", "specialty"],
        help = "One-shot mode: patient to book for"
    )]
    pub patient: Option<String>,

    #[arg(long, value_name = "ID", requires = "patient", help = "One-shot mode: doctor to assign")]
    pub doctor: Option<String>,

    #[arg(long, value_name = "ID", requires = "patient", help = "One-shot mode: new appointment id")]
    pub appointment_id: Option<String>,

    #[arg(long, requires = "patient", help = "One-shot mode: appointment date")]
    pub date: Option<String>,

    #[arg(long, requires = "patient", help = "One-shot mode: appointment specialty")]
    pub specialty: Option<String>,

    #[arg(long, help = "Session transcripts directory")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, help = "Enable tracing of booking requests")]
    pub trace: bool,

    #[arg(long, help = "Verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Debug output (print settings)")]
    pub debug: bool,
}

impl Args {
    /// Booking request from the one-shot flags, if `--patient` was given
    fn one_shot_request(&self, formats: &[String]) -> Result<Option<booking::BookingRequest>> {
        let Some(patient) = &self.patient else {
            return Ok(None);
        };
        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--{} is required with --patient", name))
        };

        Ok(Some(booking::BookingRequest {
            appointment_id: input::parse_id(
                "appointment id",
                &field(&self.appointment_id, "appointment-id")?,
            )?,
            date: input::parse_date(&field(&self.date, "date")?, formats)?,
            specialty: input::parse_specialty(&field(&self.specialty, "specialty")?),
            patient_id: input::parse_id("patient id", patient)?,
            doctor_id: input::parse_id("doctor id", &field(&self.doctor, "doctor")?)?,
        }))
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load()?
    };

    // CLI overrides
    if let Some(policy) = &args.receptionist_policy {
        cfg.booking.receptionist_policy = Some(policy.clone());
    }
    if let Some(seed) = &args.seed {
        cfg.seed.file = Some(seed.clone());
    }

    if let Err(errors) = cfg.validate() {
        for e in &errors {
            eprintln!("Config error {}", e);
        }
        return Err(anyhow::anyhow!(
            "Invalid configuration ({} error(s))",
            errors.len()
        ));
    }

    let policy = cfg.receptionist_policy();
    if args.debug {
        eprintln!("[DEBUG] Receptionist policy: {}", policy.as_string());
        eprintln!("[DEBUG] Date formats: {:?}", cfg.date_formats());
        eprintln!("[DEBUG] Seed file: {:?}", cfg.seed.file);
    }

    let directory = seed::load(cfg.seed.file.as_deref())?;

    if args.list {
        cli::print_patients(&directory);
        cli::print_doctors(&directory);
        cli::print_receptionists(&directory);
        cli::print_hospitals(&directory);
        cli::print_appointments(&directory);
        return Ok(());
    }

    let request = args.one_shot_request(&cfg.date_formats())?;

    let transcripts_dir = args
        .transcripts_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_DIR).join("sessions"));
    std::fs::create_dir_all(&transcripts_dir)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcript_path = transcripts_dir.join(format!("{}.jsonl", session_id));
    let mut transcript = transcript::Transcript::new(&transcript_path, &session_id)?;
    let mode = if request.is_some() { "one-shot" } else { "interactive" };
    transcript.session_start(mode, &policy.as_string())?;

    let trace = args.trace;
    let ctx = cli::Context {
        args,
        config: cfg,
        policy,
        directory: RefCell::new(directory),
        transcript: RefCell::new(transcript),
        session_id,
        tracing: RefCell::new(trace),
    };

    if let Some(request) = request {
        cli::run_once(&ctx, request)
    } else {
        cli::run_repl(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_date_formats;

    #[test]
    fn test_one_shot_request_from_flags() {
        let args = Args::parse_from([
            "medbook",
            "--patient",
            "1",
            "--doctor",
            "1",
            "--appointment-id",
            "5",
            "--date",
            "2024-01-10",
            "--specialty",
            "Neurologia",
        ]);
        let request = args
            .one_shot_request(&default_date_formats())
            .unwrap()
            .unwrap();
        assert_eq!(request.patient_id, 1);
        assert_eq!(request.appointment_id, 5);
        assert_eq!(request.specialty, "Neurologia");
    }

    #[test]
    fn test_no_one_shot_without_patient() {
        let args = Args::parse_from(["medbook", "--list"]);
        assert!(args.list);
        assert!(args
            .one_shot_request(&default_date_formats())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_one_shot_requires_all_fields() {
        let result = Args::try_parse_from(["medbook", "--patient", "1", "--doctor", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_one_shot_invalid_id() {
        let args = Args::parse_from([
            "medbook",
            "--patient",
            "one",
            "--doctor",
            "1",
            "--appointment-id",
            "5",
            "--date",
            "2024-01-10",
            "--specialty",
            "Neurologia",
        ]);
        let err = args.one_shot_request(&default_date_formats()).unwrap_err();
        assert!(err.to_string().contains("patient id"));
    }
}
