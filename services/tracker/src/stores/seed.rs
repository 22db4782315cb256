//! services/tracker/src/stores/seed.rs
//!
//! The example document written on first run, so a fresh install shows a
//! realistic history: three versions of a thesis proposal, the last one current.

use chrono::{DateTime, Duration, Utc};
use doc_tracker_core::domain::{
    AttachedFile, Document, DocumentStatus, Prompt, RelatedDocument, Version, VersionStatus,
};
use uuid::Uuid;

const SEED_AUTHOR: &str = "Doctoral Student";

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn prompt(name: &str, content: &str, ai_used: &str, date: DateTime<Utc>, notes: &str) -> Prompt {
    Prompt {
        id: Uuid::new_v4(),
        name: name.to_string(),
        content: content.to_string(),
        ai_used: ai_used.to_string(),
        date,
        notes: notes.to_string(),
    }
}

fn related(name: &str, url: &str) -> RelatedDocument {
    RelatedDocument {
        name: name.to_string(),
        url: url.to_string(),
    }
}

fn file(name: &str, file_type: &str, size: &str, upload_date: DateTime<Utc>, description: &str) -> AttachedFile {
    AttachedFile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        file_type: file_type.to_string(),
        size: size.to_string(),
        upload_date,
        description: description.to_string(),
    }
}

pub(crate) fn sample_documents(now: DateTime<Utc>) -> Vec<Document> {
    let v1 = Version {
        id: Uuid::new_v4(),
        version: "1.0.0".to_string(),
        description: "Initial version of the proposal".to_string(),
        changes: "Document created with the basic structure".to_string(),
        author: SEED_AUTHOR.to_string(),
        created_at: days_ago(now, 30),
        status: VersionStatus::Archived,
        file_location: "/Documents/Thesis/Proposal_v1.0.0.docx".to_string(),
        file_name: "Proposal_v1.0.0.docx".to_string(),
        prompts: vec![prompt(
            "Initial structure",
            "Create a doctoral thesis proposal on artificial intelligence applied to education",
            "ChatGPT",
            days_ago(now, 30),
            "First prompt to build the base structure",
        )],
        related_documents: vec![related(
            "Bibliography.pdf",
            "/Documents/References/Bibliography.pdf",
        )],
        attached_files: vec![file(
            "Proposal_v1.0.0.docx",
            "document",
            "2.3 MB",
            days_ago(now, 30),
            "Main proposal document",
        )],
    };

    let v2 = Version {
        id: Uuid::new_v4(),
        version: "1.1.0".to_string(),
        description: "Revision with the advisor's comments".to_string(),
        changes: "Incorporated the thesis advisor's comments".to_string(),
        author: SEED_AUTHOR.to_string(),
        created_at: days_ago(now, 15),
        status: VersionStatus::Archived,
        file_location: "/Documents/Thesis/Proposal_v1.1.0.docx".to_string(),
        file_name: "Proposal_v1.1.0.docx".to_string(),
        prompts: vec![
            prompt(
                "Methodology review",
                "Revise the proposal incorporating the advisor's comments on methodology and specific objectives",
                "Claude",
                days_ago(now, 16),
                "Incorporate advisor feedback",
            ),
            prompt(
                "Sharpen objectives",
                "Rewrite the specific objectives so they are clearer and measurable",
                "ChatGPT",
                days_ago(now, 15),
                "Clarify objectives as suggested",
            ),
        ],
        related_documents: vec![
            related("Advisor_Comments.pdf", "/Documents/Feedback/Advisor_Comments.pdf"),
            related("Updated_Methodology.docx", "/Documents/Methodology/Updated_Methodology.docx"),
        ],
        attached_files: vec![
            file(
                "Proposal_v1.1.0.docx",
                "document",
                "2.8 MB",
                days_ago(now, 15),
                "Revised version with comments",
            ),
            file(
                "Advisor_Comments.pdf",
                "pdf",
                "1.2 MB",
                days_ago(now, 16),
                "Feedback from the thesis advisor",
            ),
        ],
    };

    let v3 = Version {
        id: Uuid::new_v4(),
        version: "2.0.0".to_string(),
        description: "Final version for the committee".to_string(),
        changes: "Final version reviewed and approved for the committee".to_string(),
        author: SEED_AUTHOR.to_string(),
        created_at: days_ago(now, 2),
        status: VersionStatus::Current,
        file_location: "/Documents/Thesis/Proposal_Final_v2.0.0.docx".to_string(),
        file_name: "Proposal_Final_v2.0.0.docx".to_string(),
        prompts: vec![
            prompt(
                "Final version",
                "Finish the thesis proposal with all corrections and prepare the committee presentation",
                "GPT-4",
                days_ago(now, 3),
                "Preparation for the final presentation",
            ),
            prompt(
                "Build presentation",
                "Create a 15-slide presentation based on the final proposal for the evaluation committee",
                "Claude",
                days_ago(now, 2),
                "Presentation for the defense",
            ),
        ],
        related_documents: vec![
            related("Committee_Presentation.pptx", "/Documents/Presentations/Committee_Presentation.pptx"),
            related("Research_Schedule.xlsx", "/Documents/Schedules/Research_Schedule.xlsx"),
            related("Research_Budget.pdf", "/Documents/Budgets/Research_Budget.pdf"),
        ],
        attached_files: vec![
            file(
                "Proposal_Final_v2.0.0.docx",
                "document",
                "3.1 MB",
                days_ago(now, 2),
                "Final version for the committee",
            ),
            file(
                "Committee_Presentation.pptx",
                "presentation",
                "4.2 MB",
                days_ago(now, 2),
                "Presentation for the committee defense",
            ),
            file(
                "Research_Schedule.xlsx",
                "spreadsheet",
                "156 KB",
                days_ago(now, 2),
                "Detailed research schedule",
            ),
        ],
    };

    vec![Document {
        id: Uuid::new_v4(),
        title: "Doctoral Thesis Proposal".to_string(),
        description: "Main research proposal for the PhD in Computer Science".to_string(),
        category: "thesis".to_string(),
        created_at: days_ago(now, 30),
        updated_at: days_ago(now, 2),
        current_version: "2.0.0".to_string(),
        tags: vec!["thesis".to_string(), "proposal".to_string(), "research".to_string()],
        status: DocumentStatus::Review,
        versions: vec![v1, v2, v3],
    }]
}
