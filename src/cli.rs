use crate::{
    booking::{self, Booking, BookingRequest, ReceptionistPolicy},
    config::Config,
    directory::Directory,
    error::BookingError,
    input,
    notify::{notify, Role},
    transcript::Transcript,
    Args,
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;

const RULE: &str = "--------------------------------------------------";

pub struct Context {
    pub args: Args,
    pub config: Config,
    pub policy: ReceptionistPolicy,
    pub directory: RefCell<Directory>,
    pub transcript: RefCell<Transcript>,
    pub session_id: String,
    pub tracing: RefCell<bool>,
}

/// Source of answers for the guided booking
pub trait Prompter {
    /// Returns `None` when the user cancels (EOF or Ctrl-C)
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl Prompter for DefaultEditor {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        println!("{}", prompt);
        match self.readline("> ") {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn trace(ctx: &Context, label: &str, content: &str) {
    if *ctx.tracing.borrow() {
        eprintln!("[TRACE:{}] {}", label, content);
    }
}

fn verbose(ctx: &Context, message: &str) {
    if ctx.args.verbose || ctx.args.debug {
        eprintln!("[VERBOSE] {}", message);
    }
}

/// Report a domain error and keep going
fn report(ctx: &Context, err: &BookingError) {
    eprintln!("Error: {}", err);
    if let Err(e) = ctx.transcript.borrow_mut().booking_error(err) {
        verbose(ctx, &format!("failed to record error: {}", e));
    }
}

/// Unwrap a step of the guided booking, reporting a failure
fn attempt<T>(ctx: &Context, step: Result<T, BookingError>) -> Option<T> {
    match step {
        Ok(value) => Some(value),
        Err(err) => {
            report(ctx, &err);
            None
        }
    }
}

fn print_roles<'a>(title: &str, roles: impl Iterator<Item = Role<'a>>) {
    println!("{}:", title);
    for role in roles {
        println!("{}", role.describe());
    }
}

pub fn print_patients(directory: &Directory) {
    print_roles("Patients", directory.patients().map(Role::Patient));
}

pub fn print_doctors(directory: &Directory) {
    print_roles("Doctors", directory.doctors().map(Role::Doctor));
}

pub fn print_receptionists(directory: &Directory) {
    print_roles("Receptionists", directory.receptionists().map(Role::Receptionist));
}

pub fn print_hospitals(directory: &Directory) {
    println!("Hospitals:");
    for h in directory.hospitals() {
        println!("{}", h.describe());
    }
}

pub fn print_appointments(directory: &Directory) {
    println!("Appointments:");
    for a in directory.appointments() {
        println!("{}", a.describe());
    }
}

/// Book, print the confirmation, then notify every party.
pub fn confirm_booking(ctx: &Context, request: BookingRequest) -> Result<Booking, BookingError> {
    trace(ctx, "request", &format!("{:?}", request));

    let booking = booking::book(&mut ctx.directory.borrow_mut(), ctx.policy, request)?;
    let _ = ctx.transcript.borrow_mut().appointment_booked(&booking);
    verbose(
        ctx,
        &format!(
            "appointment {} ({}) assigned to receptionist {}",
            booking.appointment.id(),
            booking.appointment.specialty(),
            booking.receptionist_id
        ),
    );

    let directory = ctx.directory.borrow();
    let patient = directory.patient(booking.patient_id)?;
    println!(
        "Appointment created for patient {}",
        patient.identity.full_name()
    );
    println!("{}", RULE);
    println!("{}", booking.appointment.describe());

    let messages = booking::notify_parties(&directory, &booking)?;
    for message in &messages {
        println!("{}", RULE);
        println!("Notifying {}", message.role.as_str());
        println!("{}", message);
        let _ = ctx.transcript.borrow_mut().notification(message);
    }

    Ok(booking)
}

/// Walk the user through one booking.
///
/// Returns `Ok(None)` when the user cancels at a prompt.
pub fn guided_booking(ctx: &Context, prompter: &mut dyn Prompter) -> Result<Option<Booking>> {
    macro_rules! ask {
        ($prompt:expr) => {
            match prompter.ask($prompt)? {
                Some(answer) => answer,
                None => {
                    println!("Booking cancelled");
                    return Ok(None);
                }
            }
        };
    }

    let formats = ctx.config.date_formats();

    print_patients(&ctx.directory.borrow());
    println!("{}", RULE);
    let answer = ask!("Enter the patient id for the new appointment:");
    let Some(patient_id) = attempt(
        ctx,
        input::parse_id("patient id", &answer)
            .and_then(|id| ctx.directory.borrow().patient(id).map(|p| p.id())),
    ) else {
        return Ok(None);
    };
    let _ = ctx.transcript.borrow_mut().patient_selected(patient_id);
    println!("{}", RULE);

    print_appointments(&ctx.directory.borrow());
    println!("{}", RULE);
    let answer = ask!("Enter the id of the appointment to create:");
    let Some(appointment_id) = attempt(ctx, input::parse_id("appointment id", &answer)) else {
        return Ok(None);
    };
    let answer = ask!("Enter the appointment date (yyyy-mm-dd or dd/mm/yyyy):");
    let Some(date) = attempt(ctx, input::parse_date(&answer, &formats)) else {
        return Ok(None);
    };
    let specialty = input::parse_specialty(&ask!("Enter the appointment specialty:"));
    println!("{}", RULE);

    print_doctors(&ctx.directory.borrow());
    println!("{}", RULE);
    let answer = ask!("Enter the doctor id to assign to the appointment:");
    let Some(doctor_id) = attempt(
        ctx,
        input::parse_id("doctor id", &answer)
            .and_then(|id| ctx.directory.borrow().doctor(id).map(|d| d.id())),
    ) else {
        return Ok(None);
    };
    let _ = ctx.transcript.borrow_mut().doctor_selected(doctor_id);
    println!("{}", RULE);

    let request = BookingRequest {
        appointment_id,
        date,
        specialty,
        patient_id,
        doctor_id,
    };
    Ok(attempt(ctx, confirm_booking(ctx, request)))
}

/// Non-interactive booking from command-line flags
pub fn run_once(ctx: &Context, request: BookingRequest) -> Result<()> {
    match confirm_booking(ctx, request) {
        Ok(_) => Ok(()),
        Err(err) => {
            let _ = ctx.transcript.borrow_mut().booking_error(&err);
            Err(err.into())
        }
    }
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("medbook - appointment desk");
    guided_booking(&ctx, &mut rl)?;
    println!("{}", RULE);
    println!("Type /help for commands, /exit to quit");

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if handle_command(&ctx, line, &mut rl)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Returns `true` when the session should end
fn handle_command(ctx: &Context, cmd: &str, rl: &mut DefaultEditor) -> Result<bool> {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match parts[0] {
        "/exit" | "/quit" => return Ok(true),
        "/help" => {
            println!("Commands:");
            println!("  /book                   - book a new appointment");
            println!("  /patients               - list patients");
            println!("  /doctors                - list doctors");
            println!("  /receptionists          - list receptionists");
            println!("  /hospitals [id]         - list hospitals, or show one");
            println!("  /appointments [id]      - list all appointments, or show one");
            println!("  /history <patient-id>   - appointments booked for a patient");
            println!("  /pending <doctor-id>    - pending appointments of a doctor");
            println!("  /notify <role> <id>     - repeat the latest notification for a patient, doctor or receptionist");
            println!("  /session                - show session info");
            println!("  /trace                  - toggle tracing");
            println!("  /exit                   - quit");
        }
        "/book" => {
            guided_booking(ctx, rl)?;
        }
        "/patients" => print_patients(&ctx.directory.borrow()),
        "/doctors" => print_doctors(&ctx.directory.borrow()),
        "/receptionists" => print_receptionists(&ctx.directory.borrow()),
        "/hospitals" if arg.is_empty() => print_hospitals(&ctx.directory.borrow()),
        "/hospitals" => {
            let directory = ctx.directory.borrow();
            match input::parse_id("hospital id", arg).and_then(|id| directory.hospital(id)) {
                Ok(hospital) => println!("{}", hospital.describe()),
                Err(err) => report(ctx, &err),
            }
        }
        "/appointments" if arg.is_empty() => print_appointments(&ctx.directory.borrow()),
        "/appointments" => {
            let directory = ctx.directory.borrow();
            match input::parse_id("appointment id", arg).and_then(|id| directory.appointment(id)) {
                Ok(appointment) => println!("{}", appointment),
                Err(err) => report(ctx, &err),
            }
        }
        "/notify" => handle_notify_command(ctx, arg),
        "/history" => {
            let directory = ctx.directory.borrow();
            let lookup = input::parse_id("patient id", arg).and_then(|id| directory.patient(id));
            match lookup {
                Ok(patient) if patient.appointments().is_empty() => {
                    println!("No appointments for {}", patient.identity.full_name());
                }
                Ok(patient) => {
                    println!("Appointments of {}:", patient.identity.full_name());
                    for a in patient.appointments() {
                        println!("  {}", a);
                    }
                }
                Err(err) => report(ctx, &err),
            }
        }
        "/pending" => {
            let directory = ctx.directory.borrow();
            let lookup = input::parse_id("doctor id", arg).and_then(|id| directory.doctor(id));
            match lookup {
                Ok(doctor) if doctor.pending_appointments().is_empty() => {
                    println!("No pending appointments for Dr. {}", doctor.identity.full_name());
                }
                Ok(doctor) => {
                    println!("Pending appointments of Dr. {}:", doctor.identity.full_name());
                    for a in doctor.pending_appointments() {
                        println!("  {}", a);
                    }
                }
                Err(err) => report(ctx, &err),
            }
        }
        "/session" => {
            println!("Session: {}", ctx.session_id);
            println!("Transcript: {:?}", ctx.transcript.borrow().path);
            println!("Receptionist policy: {}", ctx.policy.as_string());
        }
        "/trace" => {
            let mut t = ctx.tracing.borrow_mut();
            *t = !*t;
            println!("Tracing: {}", if *t { "on" } else { "off" });
        }
        _ => println!("Unknown command: {}", parts[0]),
    }
    Ok(false)
}

fn handle_notify_command(ctx: &Context, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [role, id] = parts[..] else {
        println!("Usage: /notify patient|doctor|receptionist <id>");
        return;
    };

    let directory = ctx.directory.borrow();
    let message = match role {
        "patient" => input::parse_id("patient id", id)
            .and_then(|id| directory.patient(id))
            .and_then(|p| notify(Role::Patient(p))),
        "doctor" => input::parse_id("doctor id", id)
            .and_then(|id| directory.doctor(id))
            .and_then(|d| notify(Role::Doctor(d))),
        "receptionist" => input::parse_id("receptionist id", id)
            .and_then(|id| directory.receptionist(id))
            .and_then(|r| notify(Role::Receptionist(r))),
        _ => {
            println!("Unknown role: {}. Use patient, doctor or receptionist", role);
            return;
        }
    };

    match message {
        Ok(message) => {
            println!("{}", message);
            let _ = ctx.transcript.borrow_mut().notification(&message);
        }
        Err(err) => report(ctx, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordKind;
    use crate::seed;
    use clap::Parser;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Replays canned answers; runs out as a cancellation
    struct Script(VecDeque<&'static str>);

    impl Prompter for Script {
        fn ask(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(String::from))
        }
    }

    fn script(answers: &[&'static str]) -> Script {
        Script(answers.iter().copied().collect())
    }

    fn context(dir: &TempDir, policy: ReceptionistPolicy) -> Context {
        let transcript = Transcript::new(&dir.path().join("t.jsonl"), "test").unwrap();
        Context {
            args: Args::parse_from(["medbook"]),
            config: Config::default(),
            policy,
            directory: RefCell::new(seed::builtin().unwrap()),
            transcript: RefCell::new(transcript),
            session_id: "test".to_string(),
            tracing: RefCell::new(false),
        }
    }

    fn transcript_types(dir: &TempDir) -> Vec<String> {
        std::fs::read_to_string(dir.path().join("t.jsonl"))
            .unwrap()
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["type"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_guided_booking_scenario() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::First);
        let mut answers = script(&["1", "5", "10/01/2024", "Neurologia", "1"]);

        let booking = guided_booking(&ctx, &mut answers).unwrap().unwrap();
        assert_eq!(booking.appointment.id(), 5);
        assert_eq!(booking.appointment.short_date(), "2024-01-10");

        let directory = ctx.directory.borrow();
        assert_eq!(directory.patient(1).unwrap().appointments().len(), 1);
        assert_eq!(directory.doctor(1).unwrap().pending_appointments()[0].id(), 5);
        assert_eq!(
            directory.receptionist(1).unwrap().pending_appointments().len(),
            1
        );

        let types = transcript_types(&dir);
        assert_eq!(
            types,
            vec![
                "patient_selected",
                "doctor_selected",
                "appointment_booked",
                "notification",
                "notification",
                "notification"
            ]
        );
    }

    #[test]
    fn test_guided_booking_unknown_patient_is_reported() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::First);
        let mut answers = script(&["99"]);

        let outcome = guided_booking(&ctx, &mut answers).unwrap();
        assert!(outcome.is_none());
        assert_eq!(transcript_types(&dir), vec!["booking_error"]);
    }

    #[test]
    fn test_guided_booking_bad_date_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::First);
        let mut answers = script(&["2", "7", "someday"]);

        assert!(guided_booking(&ctx, &mut answers).unwrap().is_none());
        assert!(!ctx.directory.borrow().has_appointment(7));
    }

    #[test]
    fn test_guided_booking_cancelled() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::First);
        let mut answers = script(&["1", "5"]);

        assert!(guided_booking(&ctx, &mut answers).unwrap().is_none());
        assert!(ctx.directory.borrow().patient(1).unwrap().appointments().is_empty());
    }

    #[test]
    fn test_run_once_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::Fixed(3));
        let request = BookingRequest {
            appointment_id: 8,
            date: chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            specialty: "Pediatria".to_string(),
            patient_id: 2,
            doctor_id: 42,
        };

        let err = run_once(&ctx, request.clone()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BookingError>(),
            Some(&BookingError::not_found(RecordKind::Doctor, 42))
        );

        let fixed = BookingRequest {
            doctor_id: 2,
            ..request
        };
        run_once(&ctx, fixed).unwrap();
        let directory = ctx.directory.borrow();
        assert_eq!(
            directory.receptionist(3).unwrap().pending_appointments()[0].id(),
            8
        );
    }

    #[test]
    fn test_notify_command() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, ReceptionistPolicy::First);
        let mut answers = script(&["3", "9", "2024-04-04", "Dermatologia", "3"]);
        guided_booking(&ctx, &mut answers).unwrap().unwrap();

        handle_notify_command(&ctx, "patient 3");
        handle_notify_command(&ctx, "doctor 2");
        handle_notify_command(&ctx, "nurse 1");

        let types = transcript_types(&dir);
        let tail: Vec<_> = types.iter().rev().take(2).rev().cloned().collect();
        // doctor 2 has nothing pending; the unknown role is only printed
        assert_eq!(tail, vec!["notification", "booking_error"]);
    }
}
