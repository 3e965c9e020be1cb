use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `content` to `root/relative`, creating parent directories
#[allow(dead_code)]
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A two-module solution:
///
/// ```text
/// Shop/Shop.sln            → App, Lib, Ghost (missing)
/// Shop/App/App.csproj      → packages/Newtonsoft.Json.dll, lib/Missing.dll
/// Shop/App/Program.cs
/// Shop/App/Models/Order.cs
/// Shop/App/obj/Generated.cs (excluded)
/// Shop/Lib/Lib.csproj
/// Shop/Lib/Lib.cs
/// Shop/packages/Newtonsoft.Json.dll
/// ```
#[allow(dead_code)]
pub fn shop_fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Shop");
    write_file(
        &root,
        "Shop.sln",
        concat!(
            "Microsoft Visual Studio Solution File, Format Version 12.00\n",
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{1}\"\n",
            "EndProject\n",
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Lib\", \"Lib\\Lib.csproj\", \"{2}\"\n",
            "EndProject\n",
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Ghost\", \"Ghost\\Ghost.csproj\", \"{3}\"\n",
            "EndProject\n",
        ),
    );
    write_file(
        &root,
        "App/App.csproj",
        concat!(
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n",
            "  <ItemGroup>\n",
            "    <Reference Include=\"Newtonsoft.Json\">\n",
            "      <HintPath>..\\packages\\Newtonsoft.Json.dll</HintPath>\n",
            "    </Reference>\n",
            "    <Reference Include=\"lib\\Missing.dll\" />\n",
            "  </ItemGroup>\n",
            "</Project>\n",
        ),
    );
    write_file(&root, "App/Program.cs", "class Program {}\n");
    write_file(&root, "App/Models/Order.cs", "class Order {}\n");
    write_file(&root, "App/obj/Generated.cs", "class Generated {}\n");
    write_file(&root, "Lib/Lib.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />\n");
    write_file(&root, "Lib/Lib.cs", "class Lib {}\n");
    write_file(&root, "packages/Newtonsoft.Json.dll", "MZ");
    (dir, root)
}
