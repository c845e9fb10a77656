//! Demo data the platform starts with, and the fallback used whenever a
//! stored collection is missing or unreadable.
use chrono::NaiveDate;
use std::collections::BTreeSet;
use crate::models::{LedgerEntry, Loan, LoanStatus, PaymentType, Role, Task, TaskStatus, User};

pub const SEED_SEEKER_ID: &str = "user123";
pub const SEED_ADMIN_ID: &str = "admin001";

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub loans: Vec<Loan>,
    pub tasks: Vec<Task>,
    pub ledger: Vec<LedgerEntry>,
}

impl SeedData {
    /// The demo platform. Both seed accounts share `password_hash`.
    pub fn demo(password_hash: &str) -> Self {
        Self {
            users: seed_users(password_hash),
            loans: seed_loans(),
            tasks: seed_tasks(),
            ledger: seed_ledger(),
        }
    }
}

fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed_users(password_hash: &str) -> Vec<User> {
    vec![
        User {
            id: SEED_SEEKER_ID.into(),
            name: "Alex Johnson".into(),
            email: "alex.johnson@example.com".into(),
            password_hash: password_hash.into(),
            legacy_password: None,
            role: Role::LoanSeeker,
            avatar_url: Some("https://placehold.co/100x100.png".into()),
            skills: skills(&["Web Design", "JavaScript", "React", "Graphic Design", "Plumbing"]),
            bio: Some("A versatile professional skilled in both digital and manual trades, looking to leverage skills for financial growth.".into()),
        },
        User {
            id: SEED_ADMIN_ID.into(),
            name: "Admin User".into(),
            email: "admin@skillcredit.com".into(),
            password_hash: password_hash.into(),
            legacy_password: None,
            role: Role::Admin,
            avatar_url: Some("https://placehold.co/100x100.png".into()),
            skills: BTreeSet::new(),
            bio: Some("Administrator for SkillCredit platform.".into()),
        },
    ]
}

fn seed_loans() -> Vec<Loan> {
    vec![
        Loan {
            id: "loan001".into(),
            user_id: SEED_SEEKER_ID.into(),
            amount: 5000.0,
            interest_rate: 0.08,
            tenure_months: 12,
            emi_amount: 434.94,
            status: LoanStatus::Active,
            application_date: date(2023, 5, 10),
            approved_date: Some(date(2023, 5, 12)),
            total_repaid: 1739.76,
            remaining_balance: 3260.24,
            bank_details: None,
        },
        Loan {
            id: "loan002".into(),
            user_id: "user456".into(),
            amount: 10000.0,
            interest_rate: 0.10,
            tenure_months: 24,
            emi_amount: 461.45,
            status: LoanStatus::Active,
            application_date: date(2023, 8, 15),
            approved_date: Some(date(2023, 8, 17)),
            total_repaid: 0.0,
            remaining_balance: 10000.0,
            bank_details: None,
        },
    ]
}

fn seed_task(
    id: &str,
    title: &str,
    description: &str,
    required: &[&str],
    credit_amount: f64,
    status: TaskStatus,
    posted_by: &str,
    assigned_to: Option<&str>,
    hint: &str,
) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        address: None,
        preferred_time_slot: None,
        skills_required: skills(required),
        credit_amount,
        status,
        posted_by: posted_by.into(),
        assigned_to: assigned_to.map(String::from),
        deadline: None,
        image_url: Some("https://placehold.co/600x400.png".into()),
        data_ai_hint: Some(hint.into()),
        funding_method: None,
        completion_requested_date: None,
        loan_seeker_payment_details_for_cod: None,
    }
}

fn seed_tasks() -> Vec<Task> {
    vec![
        seed_task(
            "task001",
            "Design a Landing Page for a Startup",
            "Create a modern and responsive landing page. Figma designs will be provided. Need HTML, CSS, and basic JS.",
            &["Web Design", "HTML", "CSS", "JavaScript"],
            300.0,
            TaskStatus::Open,
            "Tech Solutions Inc.",
            None,
            "website design",
        ),
        seed_task(
            "task002",
            "Fix Leaky Faucet in Residential Unit",
            "Identify and repair a leaky faucet in a bathroom. Standard tools required.",
            &["Plumbing"],
            75.0,
            TaskStatus::Open,
            "Property Management Co.",
            None,
            "plumbing tools",
        ),
        seed_task(
            "task003",
            "Create Company Logo",
            "Design a unique and memorable logo for a new coffee shop. Deliverables in vector format.",
            &["Graphic Design", "Branding"],
            150.0,
            TaskStatus::Completed,
            "The Daily Grind",
            Some(SEED_SEEKER_ID),
            "logo coffee",
        ),
        seed_task(
            "task004",
            "Electrical Wiring for New Room",
            "Install electrical wiring, outlets, and light fixtures for a newly constructed room. Must adhere to local codes.",
            &["Electrician"],
            400.0,
            TaskStatus::Open,
            "Home Builders Ltd.",
            None,
            "electrical wiring",
        ),
        seed_task(
            "task005",
            "Content Writing for Blog",
            "Write 5 blog posts (500 words each) on specified topics related to finance.",
            &["Content Writing"],
            250.0,
            TaskStatus::Assigned,
            "Finance Bloggers Inc.",
            Some("user789"),
            "writing blog",
        ),
        seed_task(
            "task006",
            "Develop New Feature Module",
            "Backend and frontend work for a new reporting module. Specs available.",
            &["Node.js", "React", "Database Management"],
            600.0,
            TaskStatus::InProgress,
            "Innovatech Ltd.",
            Some(SEED_SEEKER_ID),
            "software development",
        ),
    ]
}

fn seed_ledger() -> Vec<LedgerEntry> {
    vec![
        LedgerEntry {
            id: "entry001".into(),
            loan_id: "loan001".into(),
            task_id: None,
            payment_type: PaymentType::Emi,
            amount: 434.94,
            date: date(2023, 6, 1),
            description: "Monthly EMI Payment".into(),
        },
        LedgerEntry {
            id: "entry002".into(),
            loan_id: "loan001".into(),
            task_id: Some("task003".into()),
            payment_type: PaymentType::TaskCredit,
            amount: 150.0,
            date: date(2023, 6, 15),
            description: "Task: Create Company Logo".into(),
        },
        LedgerEntry {
            id: "entry003".into(),
            loan_id: "loan001".into(),
            task_id: None,
            payment_type: PaymentType::Emi,
            amount: 434.94,
            date: date(2023, 7, 1),
            description: "Monthly EMI Payment".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_shape() {
        let seed = SeedData::demo("hash");
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.tasks.len(), 6);
        assert_eq!(seed.loans.iter().filter(|l| l.user_id == SEED_SEEKER_ID).count(), 1);
        assert_eq!(seed.users[1].id, SEED_ADMIN_ID);
        assert!(seed.users.iter().all(|u| u.password_hash == "hash"));
    }
}
