use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A one-module solution with one hygiene problem of each kind:
///
/// ```text
/// Demo/Demo.sln
/// Demo/App/App.csproj
/// Demo/App/Program.cs   unsorted usings, trailing whitespace on line 4
/// Demo/App/Util.cs      no final newline
/// Demo/App/Empty.cs     blank
/// ```
pub fn demo_fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Demo");
    write_file(
        &root,
        "Demo.sln",
        concat!(
            "Microsoft Visual Studio Solution File, Format Version 12.00\n",
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{1}\"\n",
            "EndProject\n",
        ),
    );
    write_file(&root, "App/App.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />\n");
    write_file(
        &root,
        "App/Program.cs",
        "using Zeta.Tools;\nusing System;\n\nclass Program {}  \n",
    );
    write_file(&root, "App/Util.cs", "class Util {}");
    write_file(&root, "App/Empty.cs", "\n");
    (dir, root)
}
