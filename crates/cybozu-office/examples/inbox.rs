//! List the inbox and the members of one group
//!
//! Reads the connection settings from the environment (or a `.env` file):
//!
//! ```bash
//! export CYBOZU_OFFICE_BASE_URL=https://office.example.com/scripts/office10/ag.cgi
//! export CYBOZU_OFFICE_ACCOUNT=takahashi
//! export CYBOZU_OFFICE_PASSWORD=...
//! cargo run --example inbox -- 13
//! ```

use cybozu_office::{Client, types::SortOrder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let client = Client::from_env()?;

    match client.folders().inbox(SortOrder::Descending).await? {
        Some(messages) => {
            for message in messages {
                let id = match (message.db_id, message.doc_id) {
                    (Some(db), Some(doc)) => format!("{}/{}", db, doc),
                    _ => "-".to_string(),
                };
                println!("{:>12}  {}", id, message.subject);
            }
        }
        None => println!("Inbox is empty"),
    }

    if let Some(group_id) = std::env::args().nth(1).and_then(|arg| arg.parse().ok()) {
        println!();
        for member in client.users().group_members(group_id).await? {
            println!("{:>6}  {}", member.uid, member.user_name);
        }
    }

    // Persist this to CYBOZU_OFFICE_SESSION to skip the login next time
    if let Some(session) = client.session_credentials().await {
        println!("\nsession: {}", session.cookie);
    }

    Ok(())
}
