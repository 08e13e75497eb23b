use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::PathChild;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A throwaway home directory and build file, with the fixture catalog
struct Bench {
    dir: TempDir,
}

impl Bench {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn build_path(&self) -> PathBuf {
        self.dir.child("build.json").path().to_path_buf()
    }

    fn cmd(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        Command::cargo_bin("bconf")
            .unwrap()
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("BCONF_API_URL")
            .env_remove("BCONF_ENV")
            .env_remove("RUST_LOG")
            .arg("--catalog")
            .arg(fixture("catalog.json"))
            .arg("--build")
            .arg(self.build_path())
            .args(args)
            .assert()
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.cmd(args).success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }

    fn fail(&self, args: &[&str]) -> String {
        let output = self.cmd(args).failure().get_output().stderr.clone();
        String::from_utf8(output).unwrap()
    }

    fn build(&self) -> serde_json::Value {
        let contents = std::fs::read_to_string(self.build_path()).unwrap();
        serde_json::from_str(&contents).unwrap()
    }
}

#[test]
fn test_board_filters_cpu_listing() {
    let bench = Bench::new();
    bench.ok(&["select", "motherboard", "Материнская плата MSI PRO B660M-A"]);

    let listing: serde_json::Value =
        serde_json::from_str(&bench.ok(&["options", "cpu", "--format", "json"])).unwrap();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Intel® Core™ i5-12400F Processor"]);
}

#[test]
fn test_motherboard_listing_skips_misfiled_rows() {
    let bench = Bench::new();
    let listing: serde_json::Value = serde_json::from_str(&bench.ok(&[
        "options",
        "motherboard",
        "--sort",
        "price",
        "--format",
        "json",
    ]))
    .unwrap();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Материнская плата Mini-ITX N100 SO-DIMM",
            "Материнская плата MSI PRO B660M-A",
            "Материнская плата ASUS TUF B550",
        ]
    );
}

#[test]
fn test_integrated_board_replaces_cpu() {
    let bench = Bench::new();
    bench.ok(&["select", "cpu", "AMD Ryzen 5 5600 Processor"]);

    let out = bench.ok(&[
        "select",
        "motherboard",
        "Материнская плата Mini-ITX N100 SO-DIMM",
    ]);
    assert!(out.contains("processor removed"), "{out}");
    assert!(bench.build().get("CPU").is_none());

    let err = bench.fail(&["options", "cpu"]);
    assert!(err.contains("CPU unavailable"), "{err}");
}

#[test]
fn test_memory_ceiling_follows_board() {
    let bench = Bench::new();
    bench.ok(&["select", "motherboard", "Материнская плата MSI PRO B660M-A"]);

    let out = bench.ok(&["add", "ram", "Kingston FURY 2x8Gb DDR4"]);
    assert!(out.contains("RAM: 2/2 slots used"), "{out}");

    let err = bench.fail(&["add", "ram", "Kingston FURY 16Gb DDR4"]);
    assert!(err.contains("ceiling is 2"), "{err}");
    assert!(err.contains("hint:"), "{err}");

    assert_eq!(
        bench.build()["RAM"],
        serde_json::json!([{"name": "Kingston FURY 2x8Gb DDR4", "kits": 1}])
    );
}

#[test]
fn test_memory_type_veto() {
    let bench = Bench::new();
    bench.ok(&["select", "motherboard", "Материнская плата MSI PRO B660M-A"]);

    let err = bench.fail(&["add", "ram", "Kingston FURY 16Gb DDR5"]);
    assert!(
        err.contains("motherboard supports DDR4, module is DDR5"),
        "{err}"
    );
}

#[test]
fn test_drive_quantities() {
    let bench = Bench::new();
    bench.ok(&["add", "ssd", "Samsung NVMe 512GB"]);

    let out = bench.ok(&["qty", "ssd", "Samsung NVMe 512GB", "3"]);
    assert!(out.contains("SSD: 3/4 slots used"), "{out}");

    let err = bench.fail(&["qty", "ssd", "Samsung NVMe 512GB", "-1"]);
    assert!(err.contains("Invalid kit count: -1"), "{err}");

    let err = bench.fail(&["qty", "ssd", "Samsung NVMe 1TB", "2"]);
    assert!(err.contains("ceiling is 4"), "{err}");

    bench.ok(&["qty", "ssd", "Samsung NVMe 512GB", "0"]);
    assert!(bench.build().get("SSD").is_none());
}

#[test]
fn test_select_rejects_unknown_and_multi_kit() {
    let bench = Bench::new();

    let err = bench.fail(&["select", "gpu", "Voodoo 2"]);
    assert!(err.contains("Unknown GPU option: Voodoo 2"), "{err}");

    let err = bench.fail(&["select", "ram", "Kingston FURY 16Gb DDR4"]);
    assert!(err.contains("bconf add"), "{err}");
}

#[test]
fn test_summary_json() {
    let bench = Bench::new();
    bench.ok(&["select", "gpu", "Видеокарта Palit GeForce RTX 4060 Dual"]);
    bench.ok(&["select", "psu", "Блок питания Chieftec 600W"]);
    bench.ok(&["qty", "ssd", "Samsung NVMe 512GB", "2"]);

    let summary: serde_json::Value =
        serde_json::from_str(&bench.ok(&["summary", "--format", "json"])).unwrap();
    assert_eq!(
        summary["build_name"],
        "Компьютер BConf (GeForce RTX 4060 8Gb, SSD 512Gb, SSD 512Gb, 600W)"
    );
    assert_eq!(summary["grand_total"], "47000");
    assert_eq!(summary["line_items"].as_array().unwrap().len(), 4);
}

#[test]
fn test_brand_from_config() {
    let bench = Bench::new();
    let config = bench.dir.child(".bconf").child("config.toml");
    std::fs::create_dir_all(config.path().parent().unwrap()).unwrap();
    std::fs::write(config.path(), "brand = \"Acme\"\n").unwrap();

    bench.ok(&["select", "psu", "Блок питания Chieftec 600W"]);
    let summary: serde_json::Value =
        serde_json::from_str(&bench.ok(&["summary", "--format", "json"])).unwrap();
    assert_eq!(summary["build_name"], "Компьютер Acme (600W)");
}

#[test]
fn test_preset_export() {
    let bench = Bench::new();
    bench.ok(&["preset", "Офисный"]);

    let export = bench.ok(&["export"]).replace('\t', " | ");
    insta::assert_snapshot!(export, @r"
    Компьютер BConf (Intel Core i5-12400F, B660, DDR4 2x8Gb, SSD 512Gb)
    Код | Артикул | Наименование | Кол-во | Цена
    C-100 | BX12400F | Intel® Core™ i5-12400F Processor | 1 | 15000
    MB-1 |  | Материнская плата MSI PRO B660M-A | 1 | 11000
    R-1 |  | Kingston FURY 2x8Gb DDR4 | 1 | 4000
    S-1 |  | Samsung NVMe 512GB | 1 | 5000
     |  | Итого |  | 35000
    ");
}

#[test]
fn test_export_to_file() {
    let bench = Bench::new();
    bench.ok(&["add", "ssd", "Samsung NVMe 512GB"]);

    let out = bench.dir.child("order.txt");
    bench.ok(&["export", "--output", out.path().to_str().unwrap()]);

    let text = std::fs::read_to_string(out.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Компьютер BConf (SSD 512Gb)");
    assert_eq!(lines.last().copied(), Some("\t\tИтого\t\t5000"));
}

#[test]
fn test_stale_preset_warns() {
    let bench = Bench::new();
    let output = bench.cmd(&["preset", "старый"]).success().get_output().clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no longer in the catalog"), "{stderr}");

    let summary: serde_json::Value =
        serde_json::from_str(&bench.ok(&["summary", "--format", "json"])).unwrap();
    assert_eq!(summary["grand_total"], "5000");
    assert_eq!(summary["line_items"][0]["known"], false);
}

#[test]
fn test_unknown_preset() {
    let bench = Bench::new();
    let err = bench.fail(&["preset", "Игровой"]);
    assert!(err.contains("No preset named 'Игровой'"), "{err}");
}

#[test]
fn test_remove_and_clear() {
    let bench = Bench::new();
    bench.ok(&["select", "gpu", "Видеокарта Palit GeForce RTX 4060 Dual"]);
    bench.ok(&["add", "ssd", "Samsung NVMe 512GB"]);
    bench.ok(&["add", "ssd", "Samsung NVMe 1TB"]);

    bench.ok(&["remove", "ssd", "Samsung NVMe 1TB"]);
    assert_eq!(
        bench.build()["SSD"],
        serde_json::json!([{"name": "Samsung NVMe 512GB", "kits": 1}])
    );

    bench.ok(&["remove", "gpu"]);
    assert!(bench.build().get("GPU").is_none());

    bench.ok(&["clear"]);
    assert_eq!(bench.build(), serde_json::json!({}));
}
