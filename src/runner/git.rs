//! Git operations for base software, extensions, and model repositories
//!
//! Authentication is delegated entirely to git's native system: SSH keys
//! and agent, credential helpers, environment variables. Nothing here
//! prompts or stores credentials.

use std::path::Path;

use git2::{
    Cred, CredentialType, ErrorClass, FetchOptions, RemoteCallbacks, Repository,
    build::RepoBuilder,
};

use crate::error::{Result, StackforgeError};

/// Clone a repository into `target`.
///
/// `shallow` requests a depth-1 fetch; it is skipped for local paths and
/// `file://` URLs, which libgit2 cannot shallow-clone.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    let mut callbacks = RemoteCallbacks::new();
    credential_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    let is_local =
        url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute();
    if shallow && !is_local {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let url_to_clone = normalize_scp_url(url);
    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| StackforgeError::GitCloneFailed {
            url: url.to_string(),
            reason: friendly_git_error(&e),
        })
}

/// Resolve a ref name (branch, tag, or SHA prefix) to a full commit SHA
pub fn resolve_ref(repo: &Repository, git_ref: &str) -> Result<String> {
    let candidates = [
        git_ref.to_string(),
        format!("refs/heads/{git_ref}"),
        format!("refs/tags/{git_ref}"),
        format!("refs/remotes/origin/{git_ref}"),
    ];
    for candidate in &candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            if let Ok(commit) = reference.peel_to_commit() {
                return Ok(commit.id().to_string());
            }
        }
    }

    if let Ok(object) = repo.revparse_single(git_ref) {
        if let Ok(commit) = object.peel_to_commit() {
            return Ok(commit.id().to_string());
        }
    }

    Err(StackforgeError::GitRefResolveFailed {
        git_ref: git_ref.to_string(),
        reason: "could not resolve reference".to_string(),
    })
}

/// Check out a specific commit (detached HEAD, forced working tree)
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let fail = |e: &git2::Error| StackforgeError::GitCheckoutFailed {
        sha: sha.to_string(),
        reason: e.message().to_string(),
    };

    let oid = git2::Oid::from_str(sha).map_err(|e| fail(&e))?;
    let commit = repo.find_commit(oid).map_err(|e| fail(&e))?;
    repo.set_head_detached(commit.id()).map_err(|e| fail(&e))?;

    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout)).map_err(|e| fail(&e))
}

/// Convert SCP-style SSH URLs (`git@host:path`) to explicit `ssh://` form,
/// which libgit2 handles more reliably
fn normalize_scp_url(url: &str) -> std::borrow::Cow<'_, str> {
    if !url.starts_with("git@") || url.starts_with("ssh://") {
        return std::borrow::Cow::Borrowed(url);
    }
    match url.find(':') {
        Some(colon) => {
            let host = &url[..colon];
            let path = &url[colon + 1..];
            let path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
            std::borrow::Cow::Owned(format!("ssh://{host}{path}"))
        }
        None => std::borrow::Cow::Borrowed(url),
    }
}

/// Turn a libgit2 error into a message a user can act on
fn friendly_git_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();

    if message.contains("not found")
        || message.contains("404")
        || message.contains("too many redirects")
        || message.contains("authentication replays")
    {
        "repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "authentication failed".to_string()
    } else if message.contains("permission denied") || message.contains("access denied") {
        "permission denied".to_string()
    } else if message.contains("connection")
        || message.contains("network")
        || message.contains("timed out")
        || message.contains("timeout")
    {
        "network error".to_string()
    } else if err.class() == ErrorClass::Ssh {
        format!("SSH error: {}", err.message())
    } else {
        err.message().to_string()
    }
}

/// Delegate credentials to git's native system: SSH agent, default key
/// locations, credential helpers, then anonymous fallbacks for public
/// HTTPS repositories
fn credential_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(username) = username_from_url {
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");
                for key_name in &["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let private_key = ssh_dir.join(key_name);
                    if !private_key.exists() {
                        continue;
                    }
                    let public_key = ssh_dir.join(format!("{key_name}.pub"));
                    let public_key = public_key.exists().then_some(public_key);
                    if let Ok(cred) =
                        Cred::ssh_key(username, public_key.as_deref(), &private_key, None)
                    {
                        return Ok(cred);
                    }
                }
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }
            // Anonymous attempts let the server produce the real error for
            // public repositories.
            for username in [username_from_url.unwrap_or(""), "git", "anonymous"] {
                if let Ok(cred) = Cred::userpass_plaintext(username, "") {
                    return Ok(cred);
                }
            }
        }

        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication failed",
        ))
    });
}
