use anyhow::Result;
use bazi_engine::domain::ports::ConfigProvider;
use bazi_engine::utils::validation::Validate;
use bazi_engine::{run_batch, BaziEngine, TomlConfig};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use tempfile::TempDir;

/// 測試以 TOML 配置驅動的批次計算: csv 輸入 -> json lines 輸出
#[test]
fn test_batch_from_toml_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let input_path = format!("{}/births.csv", temp_path);
    std::fs::write(
        &input_path,
        "year,month,day,hour,gender\n\
         1990, 5, 15, 14, male\n\
         1949,10,1,9,女\n\
         2023,2,29,9,male\n\
         1990,5,15,14,male\n",
    )?;

    let config_content = format!(
        r#"
[engine]
cache_enabled = true

[output]
format = "json"

[batch]
input_path = "{0}/births.csv"
output_path = "{0}/charts.jsonl"
"#,
        temp_path
    );
    let config_path = format!("{}/batch.toml", temp_path);
    std::fs::write(&config_path, config_content)?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    let batch = config.batch.as_ref().expect("batch section");

    let engine = BaziEngine::new();
    let reader = BufReader::new(File::open(&batch.input_path)?);
    let writer = BufWriter::new(File::create(&batch.output_path)?);
    let summary = run_batch(&engine, reader, writer, config.output_format())?;

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.cached_entries, 2);

    let output = std::fs::read_to_string(&batch.output_path)?;
    let rows: Vec<serde_json::Value> = output
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0]["chart"]["day_master"], "庚金");
    assert_eq!(rows[1]["chart"]["strength"], "偏弱");
    assert_eq!(rows[1]["input"]["gender"], "female");
    assert!(rows[2]["error"]
        .as_str()
        .unwrap_or_default()
        .contains("2023-2-29"));
    assert_eq!(rows[3]["chart"], rows[0]["chart"]);

    Ok(())
}

#[test]
fn test_batch_csv_without_cache() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("births.csv");
    let output_path = temp_dir.path().join("charts.csv");
    std::fs::write(
        &input_path,
        "year,month,day,hour,gender\n1995,8,6,10,f\n1995,8,6,10,f\n",
    )?;

    let mut config = TomlConfig::from_toml_str("[output]\nformat = \"csv\"\n")?;
    config.apply_overrides(None, true);
    assert!(!config.cache_enabled());

    let engine = BaziEngine::uncached();
    let summary = run_batch(
        &engine,
        BufReader::new(File::open(&input_path)?),
        BufWriter::new(File::create(&output_path)?),
        config.output_format(),
    )?;

    assert_eq!(summary.failed, 0);
    assert_eq!(summary.cached_entries, 0);

    let mut rdr = csv::Reader::from_path(&output_path)?;
    let headers = rdr.headers()?.clone();
    assert_eq!(&headers[6], "year_pillar");
    for record in rdr.records() {
        let record = record?;
        // 乙亥 癸酉 己巳 癸巳
        assert_eq!(&record[6], "乙亥");
        assert_eq!(&record[8], "己巳");
        assert_eq!(&record[10], "己土");
        assert_eq!(&record[11], "偏弱");
        assert_eq!(&record[12], "火, 土");
        assert_eq!(&record[14], "");
    }

    Ok(())
}
