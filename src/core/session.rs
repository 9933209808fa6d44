//! Server and library selection.

use crate::core::pipeline::RunMode;
use crate::models::media::{Library, ServerResource};
use crate::services::plex::PlexServer;
use crate::services::AccountService;
use crate::{Error, Result};

/// Source of interactive choices.
pub trait Chooser {
    /// Pick one of `options`, returning its index.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Ask whether to preview or really apply the titles.
    fn choose_run_mode(&mut self) -> Result<RunMode>;
}

/// Connect straight to a server without going through plex.tv.
pub async fn connect_direct(url: &str, token: &str) -> Result<PlexServer> {
    tracing::info!("Connecting to server at {}...", url);
    PlexServer::connect(url, token).await
}

/// Let the operator pick one of the account's servers and connect to it.
pub async fn connect_account(
    account: &dyn AccountService,
    token: &str,
    chooser: &mut dyn Chooser,
) -> Result<PlexServer> {
    let resources = account.resources(token).await?;
    let resource = select_server(resources, chooser)?;

    tracing::info!("Connecting to server: {}...", resource.name);
    PlexServer::connect_resource(&resource, token).await
}

/// Pick a media server among account resources.
pub fn select_server(
    resources: Vec<ServerResource>,
    chooser: &mut dyn Chooser,
) -> Result<ServerResource> {
    let mut servers: Vec<ServerResource> = resources.into_iter().filter(|r| r.is_server()).collect();

    if servers.is_empty() {
        return Err(Error::Connection(
            "no Plex servers found on this account".to_string(),
        ));
    }
    if servers.len() == 1 {
        return Ok(servers.remove(0));
    }

    let names: Vec<String> = servers.iter().map(|s| s.name.clone()).collect();
    let idx = checked_choice(chooser.choose("Select a server", &names)?, servers.len())?;
    Ok(servers.swap_remove(idx))
}

/// Pick a library whose items carry file paths.
pub fn select_library(libraries: Vec<Library>, chooser: &mut dyn Chooser) -> Result<Library> {
    let mut candidates: Vec<Library> = libraries
        .into_iter()
        .filter(|l| l.kind.has_file_items())
        .collect();

    if candidates.is_empty() {
        return Err(Error::Connection(
            "no movie or show libraries found on server".to_string(),
        ));
    }
    if candidates.len() == 1 {
        tracing::info!("Using the only library: {}", candidates[0].title);
        return Ok(candidates.remove(0));
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|l| format!("{} ({})", l.title, l.kind))
        .collect();
    let idx = checked_choice(chooser.choose("Select a library", &labels)?, candidates.len())?;
    Ok(candidates.swap_remove(idx))
}

fn checked_choice(idx: usize, len: usize) -> Result<usize> {
    if idx < len {
        Ok(idx)
    } else {
        Err(Error::other(format!(
            "selection {} out of range (1-{})",
            idx + 1,
            len
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::LibraryKind;

    struct FixedChooser {
        pick: usize,
        asked: Vec<Vec<String>>,
    }

    impl Chooser for FixedChooser {
        fn choose(&mut self, _prompt: &str, options: &[String]) -> Result<usize> {
            self.asked.push(options.to_vec());
            Ok(self.pick)
        }

        fn choose_run_mode(&mut self) -> Result<RunMode> {
            Ok(RunMode::DryRun)
        }
    }

    fn chooser(pick: usize) -> FixedChooser {
        FixedChooser {
            pick,
            asked: Vec::new(),
        }
    }

    fn resource(name: &str, provides: &str) -> ServerResource {
        ServerResource {
            name: name.to_string(),
            provides: provides.to_string(),
            access_token: None,
            connections: vec![],
        }
    }

    fn library(title: &str, kind: LibraryKind) -> Library {
        Library {
            key: title.to_lowercase(),
            title: title.to_string(),
            kind,
            locations: vec![],
        }
    }

    #[test]
    fn test_single_server_is_chosen_without_prompt() {
        let mut c = chooser(5);
        let picked = select_server(
            vec![resource("Phone", "client"), resource("Home", "server")],
            &mut c,
        )
        .unwrap();
        assert_eq!(picked.name, "Home");
        assert!(c.asked.is_empty());
    }

    #[test]
    fn test_multiple_servers_prompt() {
        let mut c = chooser(1);
        let picked = select_server(
            vec![resource("Home", "server"), resource("Cabin", "server")],
            &mut c,
        )
        .unwrap();
        assert_eq!(picked.name, "Cabin");
        assert_eq!(c.asked, vec![vec!["Home".to_string(), "Cabin".to_string()]]);
    }

    #[test]
    fn test_no_servers() {
        let result = select_server(vec![resource("Phone", "player")], &mut chooser(0));
        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[test]
    fn test_libraries_filtered_to_file_kinds() {
        let mut c = chooser(1);
        let picked = select_library(
            vec![
                library("Movies", LibraryKind::Movie),
                library("Photos", LibraryKind::Photo),
                library("TV", LibraryKind::Show),
            ],
            &mut c,
        )
        .unwrap();
        assert_eq!(picked.title, "TV");
        assert_eq!(
            c.asked,
            vec![vec!["Movies (movie)".to_string(), "TV (show)".to_string()]]
        );
    }

    #[test]
    fn test_out_of_range_choice() {
        let result = select_library(
            vec![
                library("Movies", LibraryKind::Movie),
                library("TV", LibraryKind::Show),
            ],
            &mut chooser(2),
        );
        assert!(result.is_err());
    }
}
