use crate::args::{ContactAction, ContactsArgs};
use anyhow::{Context, Result};
use sos::domain::{Contact, ContactDraft, ContactId, UserId};
use sos::features::contacts::ContactRepository;
use std::io::Write;

/// Runs one `contacts` action and writes a human-readable result to `out`.
///
/// # Errors
/// Unknown users, invalid drafts, unknown ids and store failures.
pub async fn run(
    repo: &dyn ContactRepository,
    args: ContactsArgs,
    out: &mut impl Write,
) -> Result<()> {
    let user = UserId::parse(&args.user).context("--user must not be blank")?;

    match args.action {
        ContactAction::List => {
            let contacts = repo.list(&user).await?;
            if contacts.is_empty() {
                writeln!(out, "No contacts")?;
            }
            for contact in &contacts {
                writeln!(out, "{}", render(contact))?;
            }
        },
        ContactAction::Add { name, phone, priority } => {
            let contact = repo.add(&user, ContactDraft::new(name, phone).priority(priority)).await?;
            writeln!(out, "Added {}", render(&contact))?;
        },
        ContactAction::Update { id, name, phone, priority } => {
            let draft = ContactDraft::new(name, phone).priority(priority);
            let contact = repo.update(&user, &ContactId::new(id), draft).await?;
            writeln!(out, "Updated {}", render(&contact))?;
        },
        ContactAction::Remove { id } => {
            repo.delete(&user, &ContactId::new(id.clone())).await?;
            writeln!(out, "Removed {id}")?;
        },
        ContactAction::Priority { id } => {
            repo.set_priority(&user, &ContactId::new(id.clone())).await?;
            writeln!(out, "Priority contact is now {id}")?;
        },
    }
    Ok(())
}

fn render(contact: &Contact) -> String {
    let flag = if contact.is_priority { " [priority]" } else { "" };
    format!("{}  {}  {}{flag}", contact.id, contact.name, contact.phone)
}
