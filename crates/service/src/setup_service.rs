//! Onboarding: personal details, resume upload and completion.
use std::path::{Path, PathBuf};

use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use models::user_setup;
use crate::errors::ServiceError;

pub const ALLOWED_RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const ALLOWED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub years_experience: Option<String>,
    pub top_skills: Option<String>,
}

impl From<&user_setup::Model> for PersonalDetails {
    fn from(s: &user_setup::Model) -> Self {
        Self {
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            location: s.location.clone(),
            linkedin_url: s.linkedin_url.clone(),
            years_experience: s.years_experience.clone(),
            top_skills: s.top_skills.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeInfo {
    pub file_name: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupData {
    pub personal: PersonalDetails,
    pub resume: Option<ResumeInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupStatus {
    pub complete: bool,
    pub data: Option<SetupData>,
}

pub fn data_of(setup: &user_setup::Model) -> SetupData {
    let resume = match (&setup.resume_file_name, &setup.resume_file_path) {
        (Some(name), Some(_)) => Some(ResumeInfo { file_name: name.clone(), uploaded_at: setup.updated_at.to_rfc3339() }),
        _ => None,
    };
    SetupData { personal: PersonalDetails::from(setup), resume }
}

async fn get_or_create(db: &DatabaseConnection, user_id: Uuid) -> Result<user_setup::Model, ServiceError> {
    if let Some(found) = user_setup::find_by_user(db, user_id).await? {
        return Ok(found);
    }
    Ok(user_setup::new_for_user(user_id).insert(db).await?)
}

pub async fn status(db: &DatabaseConnection, user_id: Uuid) -> Result<SetupStatus, ServiceError> {
    Ok(match user_setup::find_by_user(db, user_id).await? {
        Some(s) => SetupStatus { complete: s.setup_complete, data: Some(data_of(&s)) },
        None => SetupStatus { complete: false, data: None },
    })
}

/// Absent fields are left as they are.
#[instrument(skip(db, input))]
pub async fn update_personal(db: &DatabaseConnection, user_id: Uuid, input: PersonalDetails) -> Result<SetupData, ServiceError> {
    let mut am: user_setup::ActiveModel = get_or_create(db, user_id).await?.into();
    if let Some(v) = input.full_name {
        am.full_name = Set(Some(v));
    }
    if let Some(v) = input.email {
        am.email = Set(Some(v));
    }
    if let Some(v) = input.phone {
        am.phone = Set(Some(v));
    }
    if let Some(v) = input.location {
        am.location = Set(Some(v));
    }
    if let Some(v) = input.linkedin_url {
        am.linkedin_url = Set(Some(v));
    }
    if let Some(v) = input.years_experience {
        am.years_experience = Set(Some(v));
    }
    if let Some(v) = input.top_skills {
        am.top_skills = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    Ok(data_of(&saved))
}

/// Content-type and size gate applied before anything touches disk.
pub fn check_resume(content_type: Option<&str>, len: usize, max_bytes: usize) -> Result<(), ServiceError> {
    if let Some(ct) = content_type {
        if !ALLOWED_RESUME_TYPES.contains(&ct) {
            return Err(ServiceError::Validation("Only PDF and DOC/DOCX files are allowed.".into()));
        }
    }
    if len > max_bytes {
        let mb = max_bytes / (1024 * 1024);
        return Err(ServiceError::Validation(format!("File too large. Maximum size is {mb}MB.")));
    }
    Ok(())
}

/// Lowercased extension of the upload, `.pdf` when missing or not allowed.
pub fn resume_extension(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    ALLOWED_EXTENSIONS.into_iter().find(|a| *a == ext).unwrap_or(".pdf")
}

/// Store the upload under `<dir>/resumes/<user_id>/`, replacing any previous file.
#[instrument(skip(db, uploads, content), fields(size = content.len()))]
pub async fn save_resume(
    db: &DatabaseConnection,
    uploads: &configs::UploadConfig,
    user_id: Uuid,
    content: &[u8],
    original_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<ResumeInfo, ServiceError> {
    check_resume(content_type, content.len(), uploads.max_resume_bytes())?;
    let setup = get_or_create(db, user_id).await?;

    let original = original_name.filter(|n| !n.trim().is_empty()).unwrap_or("resume");
    let token = Uuid::new_v4().simple().to_string();
    let stored_name = format!("{user_id}_{}{}", &token[..12], resume_extension(original));
    let user_dir: PathBuf = Path::new(&uploads.dir).join("resumes").join(user_id.to_string());
    tokio::fs::create_dir_all(&user_dir).await?;
    // stored paths must not depend on the working directory
    let user_dir = tokio::fs::canonicalize(&user_dir).await?;
    let path = user_dir.join(&stored_name);
    tokio::fs::write(&path, content).await?;

    if let Some(old) = setup.resume_file_path.as_deref() {
        if let Err(e) = tokio::fs::remove_file(old).await {
            warn!(error = %e, path = old, "old_resume_not_removed");
        }
    }

    let mut am: user_setup::ActiveModel = setup.into();
    am.resume_file_name = Set(Some(original.to_string()));
    am.resume_file_path = Set(Some(path.to_string_lossy().into_owned()));
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    info!(user_id = %user_id, file = %stored_name, "resume_saved");
    Ok(ResumeInfo { file_name: original.to_string(), uploaded_at: saved.updated_at.to_rfc3339() })
}

/// `(original file name, path on disk)` of the current resume.
pub async fn resume_path(db: &DatabaseConnection, user_id: Uuid) -> Result<(String, PathBuf), ServiceError> {
    let missing = || ServiceError::NotFound("No resume uploaded.".into());
    let setup = user_setup::find_by_user(db, user_id).await?.ok_or_else(missing)?;
    let path = PathBuf::from(setup.resume_file_path.ok_or_else(missing)?);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(missing());
    }
    let name = setup
        .resume_file_name
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "resume.pdf".to_string());
    Ok((name, path))
}

#[instrument(skip(db))]
pub async fn complete(db: &DatabaseConnection, user_id: Uuid) -> Result<(), ServiceError> {
    let no_resume = || ServiceError::Validation("Please upload your resume before completing setup.".into());
    let setup = user_setup::find_by_user(db, user_id).await?.ok_or_else(no_resume)?;
    let missing = setup.missing_requirements();
    if missing.contains(&"resume upload is required") {
        return Err(no_resume());
    }
    if !missing.is_empty() {
        return Err(ServiceError::Validation("Please fill in required personal details (name and email).".into()));
    }
    let mut am: user_setup::ActiveModel = setup.into();
    am.setup_complete = Set(true);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    info!(user_id = %user_id, "setup_completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_user};

    #[test]
    fn resume_gate() {
        let max = 5 * 1024 * 1024;
        assert!(check_resume(Some("application/pdf"), 10, max).is_ok());
        assert!(check_resume(None, 10, max).is_ok());
        let err = check_resume(Some("image/png"), 10, max).unwrap_err();
        assert_eq!(err.to_string(), "validation error: Only PDF and DOC/DOCX files are allowed.");
        let err = check_resume(Some("application/pdf"), max + 1, max).unwrap_err();
        assert_eq!(err.to_string(), "validation error: File too large. Maximum size is 5MB.");
    }

    #[test]
    fn extension_falls_back_to_pdf() {
        assert_eq!(resume_extension("CV.DOCX"), ".docx");
        assert_eq!(resume_extension("cv.doc"), ".doc");
        assert_eq!(resume_extension("cv.txt"), ".pdf");
        assert_eq!(resume_extension("resume"), ".pdf");
    }

    #[tokio::test]
    async fn onboarding_flow() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, None).await?;
        let dir = std::env::temp_dir().join(format!("jt_uploads_{}", Uuid::new_v4().simple()));
        let uploads = configs::UploadConfig { dir: dir.to_string_lossy().into_owned(), ..Default::default() };

        let st = status(&db, u.id).await?;
        assert!(!st.complete && st.data.is_none());
        assert!(matches!(resume_path(&db, u.id).await, Err(ServiceError::NotFound(_))));

        update_personal(&db, u.id, PersonalDetails { full_name: Some("Ada Lovelace".into()), ..Default::default() }).await?;
        let err = complete(&db, u.id).await.unwrap_err();
        assert_eq!(err.to_string(), "validation error: Please upload your resume before completing setup.");

        let first = save_resume(&db, &uploads, u.id, b"%PDF-1", Some("cv.pdf"), Some("application/pdf")).await?;
        assert_eq!(first.file_name, "cv.pdf");
        let (_, first_path) = resume_path(&db, u.id).await?;
        save_resume(&db, &uploads, u.id, b"%PDF-2", Some("cv2.pdf"), Some("application/pdf")).await?;
        let (name, second_path) = resume_path(&db, u.id).await?;
        assert_eq!(name, "cv2.pdf");
        assert!(!first_path.exists());
        assert!(second_path.starts_with(std::fs::canonicalize(&dir)?.join("resumes").join(u.id.to_string())));

        let err = complete(&db, u.id).await.unwrap_err();
        assert_eq!(err.to_string(), "validation error: Please fill in required personal details (name and email).");
        update_personal(&db, u.id, PersonalDetails { email: Some(u.email.clone()), ..Default::default() }).await?;
        complete(&db, u.id).await?;
        let st = status(&db, u.id).await?;
        assert!(st.complete);
        assert_eq!(st.data.and_then(|d| d.personal.full_name).as_deref(), Some("Ada Lovelace"));

        let _ = std::fs::remove_dir_all(dir);
        Ok(())
    }

    #[tokio::test]
    async fn relative_upload_dir_is_stored_absolute() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, None).await?;
        let rel = format!("jt_rel_uploads_{}", Uuid::new_v4().simple());
        let uploads = configs::UploadConfig { dir: rel.clone(), ..Default::default() };

        save_resume(&db, &uploads, u.id, b"%PDF-1", Some("cv.pdf"), Some("application/pdf")).await?;
        let stored = user_setup::find_by_user(&db, u.id).await?.and_then(|s| s.resume_file_path);
        let stored = PathBuf::from(stored.unwrap_or_default());
        assert!(stored.is_absolute(), "{}", stored.display());
        assert!(stored.exists());
        let (_, path) = resume_path(&db, u.id).await?;
        assert_eq!(path, stored);

        let _ = std::fs::remove_dir_all(rel);
        Ok(())
    }
}
