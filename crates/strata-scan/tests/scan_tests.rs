use std::fs;

use strata_graph::{ingest, path_node_id};
use strata_scan::{ScanConfig, Scanner, scan};
use tempfile::TempDir;

#[test]
fn test_two_level_tree_to_graph() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::write(root.join("sub/b.txt"), "beta").unwrap();

    let mut config = ScanConfig::new(&root);
    config.detect_git = false;
    let tree = Scanner::new(config).scan().unwrap();
    let graph = ingest(&tree).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    for edge in graph.edges() {
        assert_eq!(edge.label, "Children");
        let source = graph.node(&edge.source_id).unwrap();
        let target = graph.node(&edge.target_id).unwrap();
        assert!(source.has_label("directory"));
        let source_path = source.str_property("Path").unwrap();
        let target_path = target.str_property("Path").unwrap();
        assert!(target_path.starts_with(source_path));
    }

    let names: Vec<_> = graph
        .nodes()
        .map(|n| n.str_property("Name").unwrap().to_string())
        .collect();
    for expected in ["root", "a.txt", "sub", "b.txt"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    let root_id = path_node_id("FileEntry", &root);
    assert_eq!(graph.outgoing(&root_id).count(), 2);
}

#[test]
fn test_git_remote_scenario() {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("repo");
    fs::create_dir_all(repo.join(".git")).unwrap();
    fs::write(
        repo.join(".git/config"),
        "[core]\n\tbare = false\n[remote \"origin\"]\n\turl = https://example.com/repo.git\n",
    )
    .unwrap();

    let tree = scan(&repo).unwrap();
    let git = tree.git().unwrap();
    assert!(git.is_repo);
    assert_eq!(git.remotes.len(), 1);
    assert_eq!(git.remotes["origin"], "https://example.com/repo.git");

    let graph = ingest(&tree).unwrap();
    let node = graph.node(&path_node_id("FileEntry", &repo)).unwrap();
    assert_eq!(node.properties["IsGitRepo"].as_bool(), Some(true));
    let remotes = node.properties["GitRemotes"].as_object().unwrap();
    assert_eq!(remotes.len(), 1);
    assert_eq!(
        remotes["origin"].as_str(),
        Some("https://example.com/repo.git")
    );
}

#[test]
fn test_child_count_matches_disk() {
    let temp = TempDir::new().unwrap();
    for i in 0..20 {
        fs::write(temp.path().join(format!("f{i:02}")), "x").unwrap();
    }
    fs::create_dir(temp.path().join("d")).unwrap();

    let tree = scan(temp.path()).unwrap();
    let on_disk = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(tree.child_count(), on_disk);
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_keeps_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner"), "x").unwrap();
    fs::write(temp.path().join("open.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read it anyway; nothing to check then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let tree = scan(temp.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(tree.child_count(), 2);
    let locked_entry = tree.child("locked").unwrap();
    assert!(locked_entry.is_dir());
    assert_eq!(locked_entry.child_count(), 0);
    let error = locked_entry.error.as_deref().unwrap();
    assert!(error.starts_with("failed to read directory: Permission denied"));
    assert!(tree.child("open.txt").unwrap().error.is_none());

    let graph = ingest(&tree).unwrap();
    let node = graph
        .nodes()
        .find(|n| n.str_property("Name") == Some("locked"))
        .unwrap();
    assert!(node.str_property("Error").is_some());
}

#[test]
#[cfg(unix)]
fn test_unsearchable_directory_yields_typed_stubs() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let shut = temp.path().join("shut");
    fs::create_dir(&shut).unwrap();
    fs::write(shut.join("notes.md"), "x").unwrap();
    fs::create_dir(shut.join("nested")).unwrap();
    fs::write(shut.join("z.txt"), "x").unwrap();
    // Readable but not searchable: listing works, lstat of children fails.
    fs::set_permissions(&shut, fs::Permissions::from_mode(0o444)).unwrap();

    // Privileged users can stat the children anyway; nothing to check then.
    if fs::symlink_metadata(shut.join("notes.md")).is_ok() {
        fs::set_permissions(&shut, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let listed: Vec<String> = fs::read_dir(&shut)
        .unwrap()
        .map(|item| item.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let mut config = ScanConfig::new(temp.path());
    config.detect_git = false;
    let tree = Scanner::new(config).scan();
    fs::set_permissions(&shut, fs::Permissions::from_mode(0o755)).unwrap();
    let tree = tree.unwrap();

    let dir = tree.child("shut").unwrap();
    assert!(dir.is_dir());
    assert!(dir.error.is_none());
    let names: Vec<_> = dir.children.iter().map(|c| c.name.to_string()).collect();
    assert_eq!(names, listed);

    for child in &dir.children {
        assert_eq!(child.path, temp.path().join("shut").join(child.name.as_str()));
        assert_eq!(child.absolute_path, shut.join(child.name.as_str()));
        let error = child.error.as_deref().unwrap();
        assert!(error.starts_with("Permission denied"), "{error}");
        assert!(child.children.is_empty());
    }
    assert!(dir.child("notes.md").unwrap().is_file());
    assert_eq!(dir.child("notes.md").unwrap().extension(), Some("md"));
    assert!(dir.child("nested").unwrap().is_dir());
    assert!(dir.child("z.txt").unwrap().is_file());
}

#[test]
#[cfg(unix)]
fn test_backslash_names_stay_distinct_nodes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("r");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a/b"), "nested").unwrap();
    fs::write(root.join("a\\b"), "sibling").unwrap();

    let mut config = ScanConfig::new(&root);
    config.detect_git = false;
    let tree = Scanner::new(config).scan().unwrap();
    let graph = ingest(&tree).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    assert!(graph.node(&path_node_id("FileEntry", root.join("a/b"))).is_some());
    assert!(graph.node(&path_node_id("FileEntry", root.join("a\\b"))).is_some());
}
