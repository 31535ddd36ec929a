//! Fixed sample data and the deterministic job catalog builder.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const SEED_PASSWORD: &str = "12345678";
pub const RNG_SEED: u64 = 42;

#[derive(Debug, Clone, Copy)]
pub struct UserRow {
    pub email: &'static str,
    pub full_name: &'static str,
    pub username: &'static str,
    pub is_superuser: bool,
}

/// The first two rows are superusers.
pub const USER_ROWS: [UserRow; 50] = [
    UserRow { email: "admin@crypgo.com", full_name: "Admin User", username: "admin", is_superuser: true },
    UserRow { email: "super@crypgo.com", full_name: "Super Admin", username: "superadmin", is_superuser: true },
    UserRow { email: "alice@example.com", full_name: "Alice Smith", username: "alice_s", is_superuser: false },
    UserRow { email: "bob@example.com", full_name: "Bob Jones", username: "bob_j", is_superuser: false },
    UserRow { email: "carol@example.com", full_name: "Carol White", username: "carol_w", is_superuser: false },
    UserRow { email: "dave@example.com", full_name: "Dave Brown", username: "dave_b", is_superuser: false },
    UserRow { email: "eve@example.com", full_name: "Eve Davis", username: "eve_d", is_superuser: false },
    UserRow { email: "frank@example.com", full_name: "Frank Miller", username: "frank_m", is_superuser: false },
    UserRow { email: "grace@example.com", full_name: "Grace Lee", username: "grace_l", is_superuser: false },
    UserRow { email: "henry@example.com", full_name: "Henry Wilson", username: "henry_w", is_superuser: false },
    UserRow { email: "ivy@example.com", full_name: "Ivy Taylor", username: "ivy_t", is_superuser: false },
    UserRow { email: "jack@example.com", full_name: "Jack Anderson", username: "jack_a", is_superuser: false },
    UserRow { email: "kate@example.com", full_name: "Kate Thomas", username: "kate_t", is_superuser: false },
    UserRow { email: "leo@example.com", full_name: "Leo Jackson", username: "leo_j", is_superuser: false },
    UserRow { email: "mia@example.com", full_name: "Mia Martin", username: "mia_m", is_superuser: false },
    UserRow { email: "noah@example.com", full_name: "Noah Garcia", username: "noah_g", is_superuser: false },
    UserRow { email: "olivia@example.com", full_name: "Olivia Martinez", username: "olivia_m", is_superuser: false },
    UserRow { email: "paul@example.com", full_name: "Paul Robinson", username: "paul_r", is_superuser: false },
    UserRow { email: "quinn@example.com", full_name: "Quinn Clark", username: "quinn_c", is_superuser: false },
    UserRow { email: "rachel@example.com", full_name: "Rachel Lewis", username: "rachel_l", is_superuser: false },
    UserRow { email: "sam@example.com", full_name: "Sam Walker", username: "sam_w", is_superuser: false },
    UserRow { email: "tina@example.com", full_name: "Tina Hall", username: "tina_h", is_superuser: false },
    UserRow { email: "uma@example.com", full_name: "Uma Young", username: "uma_y", is_superuser: false },
    UserRow { email: "victor@example.com", full_name: "Victor King", username: "victor_k", is_superuser: false },
    UserRow { email: "wendy@example.com", full_name: "Wendy Wright", username: "wendy_w", is_superuser: false },
    UserRow { email: "xavier@example.com", full_name: "Xavier Lopez", username: "xavier_l", is_superuser: false },
    UserRow { email: "yara@example.com", full_name: "Yara Hill", username: "yara_h", is_superuser: false },
    UserRow { email: "zane@example.com", full_name: "Zane Scott", username: "zane_s", is_superuser: false },
    UserRow { email: "amy@example.com", full_name: "Amy Green", username: "amy_g", is_superuser: false },
    UserRow { email: "ben@example.com", full_name: "Ben Adams", username: "ben_a", is_superuser: false },
    UserRow { email: "chloe@example.com", full_name: "Chloe Nelson", username: "chloe_n", is_superuser: false },
    UserRow { email: "dan@example.com", full_name: "Dan Baker", username: "dan_b", is_superuser: false },
    UserRow { email: "emma@example.com", full_name: "Emma Carter", username: "emma_c", is_superuser: false },
    UserRow { email: "felix@example.com", full_name: "Felix Mitchell", username: "felix_m", is_superuser: false },
    UserRow { email: "gina@example.com", full_name: "Gina Perez", username: "gina_p", is_superuser: false },
    UserRow { email: "hugo@example.com", full_name: "Hugo Roberts", username: "hugo_r", is_superuser: false },
    UserRow { email: "iris@example.com", full_name: "Iris Turner", username: "iris_t", is_superuser: false },
    UserRow { email: "jake@example.com", full_name: "Jake Phillips", username: "jake_p", is_superuser: false },
    UserRow { email: "luna@example.com", full_name: "Luna Campbell", username: "luna_c", is_superuser: false },
    UserRow { email: "marc@example.com", full_name: "Marc Parker", username: "marc_p", is_superuser: false },
    UserRow { email: "nina@example.com", full_name: "Nina Evans", username: "nina_e", is_superuser: false },
    UserRow { email: "omar@example.com", full_name: "Omar Edwards", username: "omar_e", is_superuser: false },
    UserRow { email: "pia@example.com", full_name: "Pia Collins", username: "pia_c", is_superuser: false },
    UserRow { email: "quinn2@example.com", full_name: "Quinn Stewart", username: "quinn_s", is_superuser: false },
    UserRow { email: "ryan@example.com", full_name: "Ryan Sanchez", username: "ryan_s", is_superuser: false },
    UserRow { email: "sara@example.com", full_name: "Sara Morris", username: "sara_m", is_superuser: false },
    UserRow { email: "tom@example.com", full_name: "Tom Rogers", username: "tom_r", is_superuser: false },
    UserRow { email: "una@example.com", full_name: "Una Reed", username: "una_r", is_superuser: false },
    UserRow { email: "vince@example.com", full_name: "Vince Cook", username: "vince_c", is_superuser: false },
    UserRow { email: "will@example.com", full_name: "Will Morgan", username: "will_m", is_superuser: false },
];

pub const JOB_TITLES: [&str; 25] = [
    "Senior Software Engineer",
    "Frontend Developer",
    "Backend Engineer",
    "Full Stack Developer",
    "DevOps Engineer",
    "Data Engineer",
    "Machine Learning Engineer",
    "Product Manager",
    "UX Designer",
    "Technical Lead",
    "React Developer",
    "Python Developer",
    "Java Developer",
    "Node.js Developer",
    "Cloud Architect",
    "Security Engineer",
    "Mobile Developer",
    "QA Engineer",
    "Scrum Master",
    "Data Scientist",
    "Engineering Manager",
    "Solutions Architect",
    "Site Reliability Engineer",
    "iOS Developer",
    "Android Developer",
];

pub const COMPANIES: [&str; 30] = [
    "TechCorp", "DataFlow Inc", "CloudNine", "NextGen Labs", "ScaleUp",
    "CodeCraft", "DevHub", "ByteWorks", "LogicForge", "StackWave",
    "Nexus Systems", "PrimeLogic", "Vertex AI", "Nova Solutions", "Apex Tech",
    "Stellar Software", "Quantum Labs", "Pulse Systems", "Catalyst Inc", "Momentum IO",
    "Atlas Digital", "Horizon Tech", "Summit Labs", "Pinnacle Software", "Crest Systems",
    "Venture Build", "Spark Engineering", "Flux Labs", "Echo Tech", "Fusion Systems",
];

pub const LOCATIONS: [&str; 16] = [
    "Remote", "New York, NY", "San Francisco, CA", "Austin, TX",
    "Seattle, WA", "Boston, MA", "Denver, CO", "Chicago, IL",
    "Los Angeles, CA", "London, UK", "Berlin, Germany", "Toronto, Canada",
    "Amsterdam, Netherlands", "Remote (US)", "Hybrid - NYC", "Hybrid - SF",
];

pub const SOURCES: [&str; 6] = ["LinkedIn", "Indeed", "Wellfound", "RemoteOK", "Company Website", "Adzuna"];

pub const JOB_TYPES: [&str; 4] = ["Full-time", "Contract", "Part-time", "Internship"];

/// Approved is drawn twice as often as the other states.
const JOB_STATUS_POOL: [&str; 4] = ["pending", "approved", "approved", "rejected"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_url: String,
    pub salary_range: Option<String>,
    pub job_type: String,
    pub source: String,
    pub external_id: String,
    pub status: String,
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Up to `count` postings; repeated (title, company, location) draws are skipped.
/// Draw order per iteration is fixed so the catalog only depends on `rng`'s seed.
pub fn build_job_rows(rng: &mut StdRng, count: usize) -> Vec<JobRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let title = pick(rng, &JOB_TITLES);
        let company = pick(rng, &COMPANIES);
        let location = pick(rng, &LOCATIONS);
        if !seen.insert((title, company, location)) {
            continue;
        }
        let salary_range = if rng.gen::<f64>() > 0.3 {
            let low = rng.gen_range(80..=250);
            let high = rng.gen_range(120..=350);
            Some(format!("${low}k - ${high}k"))
        } else {
            None
        };
        let job_type = pick(rng, &JOB_TYPES);
        let source = pick(rng, &SOURCES);
        let status = pick(rng, &JOB_STATUS_POOL);
        rows.push(JobRow {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            description: format!("Great opportunity for {title} at {company}. We are looking for talented individuals."),
            job_url: format!("https://example.com/jobs/{}", i + 1),
            salary_range,
            job_type: job_type.to_string(),
            source: source.to_string(),
            external_id: format!("ext-{}", 1000 + i),
            status: status.to_string(),
        });
    }
    rows
}

#[derive(Debug, Clone, Copy)]
pub struct AutomationTemplate {
    pub name: &'static str,
    pub target_titles: &'static str,
    pub locations: &'static str,
    pub daily_limit: i32,
    pub platforms: &'static [&'static str],
}

pub const AUTOMATION_TEMPLATES: [AutomationTemplate; 8] = [
    AutomationTemplate { name: "Senior React roles", target_titles: "React, Frontend, TypeScript", locations: "Remote, US", daily_limit: 25, platforms: &["LinkedIn", "Wellfound"] },
    AutomationTemplate { name: "Backend Python", target_titles: "Python, Django, FastAPI", locations: "Remote", daily_limit: 20, platforms: &["LinkedIn", "Indeed"] },
    AutomationTemplate { name: "Full-stack Node", target_titles: "Node.js, Full Stack, JavaScript", locations: "Remote, EU", daily_limit: 30, platforms: &["LinkedIn"] },
    AutomationTemplate { name: "DevOps / SRE", target_titles: "DevOps, SRE, AWS, Kubernetes", locations: "Remote, US", daily_limit: 15, platforms: &["Indeed", "Wellfound"] },
    AutomationTemplate { name: "Data Engineer", target_titles: "Data Engineer, ETL, Spark", locations: "Remote", daily_limit: 20, platforms: &["LinkedIn", "Indeed"] },
    AutomationTemplate { name: "ML Engineer", target_titles: "Machine Learning, ML, Python", locations: "Remote, US", daily_limit: 10, platforms: &["LinkedIn"] },
    AutomationTemplate { name: "Frontend EU", target_titles: "Frontend, React, Vue", locations: "EU, UK, Remote", daily_limit: 25, platforms: &["LinkedIn", "RemoteOK"] },
    AutomationTemplate { name: "Mobile apps", target_titles: "iOS, Android, React Native", locations: "Remote", daily_limit: 15, platforms: &["Indeed"] },
];

/// Capitalize each alphabetic run, e.g. `"mary-jane"` -> `"Mary-Jane"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

pub fn headline_for(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    format!("Software Engineer at {}", title_case(local))
}
