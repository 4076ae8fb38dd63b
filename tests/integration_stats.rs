//! Library statistics over a folder tree laid out like an organized library.

use assert_fs::prelude::*;
use photo_organizer::core::stats::LibraryAnalyzer;
use predicates::prelude::*;

#[test]
fn counts_years_months_and_pending_review() {
    let library = assert_fs::TempDir::new().unwrap();
    library.child("2022/03_Marzo/beach.jpg").write_binary(b"jpeg").unwrap();
    library.child("2022/03_Marzo/beach_1.jpg").write_binary(b"jpeg").unwrap();
    library.child("2022/07_Julio/dunes.png").write_binary(b"png").unwrap();
    library.child("2022/07_Julio/notes.txt").write_str("not a photo").unwrap();
    library.child("2023/06_Junio/garden.heic").write_binary(b"heic").unwrap();
    library.child("2024/01_Enero").create_dir_all().unwrap();
    library.child("2024/02_Febrero").create_dir_all().unwrap();
    library
        .child("00_PENDIENTE_REVISION/FOTOS_SIN_FECHA/scan.jpg")
        .write_binary(b"jpeg")
        .unwrap();
    library
        .child("00_PENDIENTE_REVISION/CALIDAD_DUDOSA")
        .create_dir_all()
        .unwrap();
    library.child("reporte_organizacion.json").write_str("{}").unwrap();

    library
        .child("2022/03_Marzo")
        .assert(predicate::path::is_dir());

    let stats = LibraryAnalyzer::new().analyze(library.path()).unwrap();

    assert_eq!(stats.total_photos, 4);
    assert_eq!(
        stats.years.iter().map(|y| y.year.as_str()).collect::<Vec<_>>(),
        vec!["2022", "2023"]
    );
    assert_eq!(stats.years[0].total, 3);
    assert_eq!(stats.years[0].top_months(1)[0].folder, "03_Marzo");
    assert_eq!(stats.top_years(1)[0].year, "2022");
    assert_eq!(stats.average_per_year(), Some(2));
    assert_eq!(stats.empty_month_folders, 2);
    assert_eq!(stats.total_pending(), 1);
    assert_eq!(stats.pending_review[0].folder, "FOTOS_SIN_FECHA");
}

#[test]
fn review_and_problem_folders_are_not_years() {
    let library = assert_fs::TempDir::new().unwrap();
    library
        .child("00_METADATOS_PROBLEMA/odd.jpg")
        .write_binary(b"jpeg")
        .unwrap();
    library.child("misc/old.jpg").write_binary(b"jpeg").unwrap();

    let stats = LibraryAnalyzer::new().analyze(library.path()).unwrap();

    assert_eq!(stats.total_photos, 0);
    assert!(stats.years.is_empty());
    assert_eq!(stats.average_per_year(), None);
}

#[test]
fn missing_library_is_an_error() {
    let parent = assert_fs::TempDir::new().unwrap();
    let missing = parent.child("nowhere");
    missing.assert(predicate::path::missing());

    assert!(LibraryAnalyzer::new().analyze(missing.path()).is_err());
}
