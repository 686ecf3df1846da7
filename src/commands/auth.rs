//! Authentication commands
//!
//! Sign-up and sign-in sit behind the public-route guard; the resulting
//! session is written to the configured store and published through the
//! session handle.

use colored::Colorize;

use crate::api::types::{AuthResponse, SignInRequest, SignUpRequest};
use crate::commands::AppContext;
use crate::error::Result;
use crate::session::Session;

/// Create an account and sign in.
pub async fn sign_up(
    ctx: &AppContext,
    email: String,
    password: String,
    full_name: Option<String>,
) -> Result<()> {
    if !ctx.allow_signed_out_screen() {
        return Ok(());
    }
    let request = SignUpRequest {
        email,
        password,
        full_name,
    };
    let response = ctx.api.sign_up(&request).await?;
    establish(ctx, &response)?;
    println!(
        "{}",
        format!("Account created. Signed in as {}", response.user.email).green()
    );
    Ok(())
}

/// Sign in with an existing account.
pub async fn sign_in(ctx: &AppContext, email: String, password: String) -> Result<()> {
    if !ctx.allow_signed_out_screen() {
        return Ok(());
    }
    let response = ctx.api.sign_in(&SignInRequest { email, password }).await?;
    establish(ctx, &response)?;
    println!(
        "{}",
        format!("Signed in as {}", response.user.email).green()
    );
    Ok(())
}

fn establish(ctx: &AppContext, response: &AuthResponse) -> Result<()> {
    let session = Session::from_auth_response(response);
    ctx.store.save(&session)?;
    ctx.session.sign_in(session);
    Ok(())
}

/// Sign out locally and on the backend.
///
/// The local session is cleared even when the backend call fails; that
/// failure is reported as a warning.
pub async fn sign_out(ctx: &AppContext) -> Result<()> {
    if !ctx.session.snapshot().is_authenticated() {
        println!("{}", "Not signed in.".yellow());
        return Ok(());
    }

    let remote = ctx.api.sign_out().await;
    ctx.store.clear()?;
    ctx.session.sign_out();

    match remote {
        Ok(_) => println!("{}", "Signed out.".green()),
        Err(e) => {
            tracing::warn!("Backend sign-out failed: {}", e);
            println!("{}", "Signed out locally.".green());
            eprintln!("{}", format!("Warning: {}", e).yellow());
        }
    }
    Ok(())
}

/// Show the signed-in user as the backend sees it.
pub async fn whoami(ctx: &AppContext) -> Result<()> {
    ctx.require_signed_in()?;
    let user = ctx.api.current_user().await?;
    println!("{}", user.email.bold());
    if let Some(name) = user.full_name.filter(|n| !n.is_empty()) {
        println!("  Name: {}", name);
    }
    println!("  ID:   {}", user.id);
    Ok(())
}
