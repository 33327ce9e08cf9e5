use crate::config::AppConfig;
use crate::domain::entities::table::{BaseTable, ESTABLISHMENT_COLUMN, PRODUCT_COLUMN};
use crate::domain::pricing::Total;
use crate::usecase::graph::{Cell, Event, BASE_UPDATED_MESSAGE};
use crate::usecase::services::import_service::Upload;
use crate::usecase::session::Session;

const CATALOG_CSV: &str = "Cod_Prod,Nombre,Fracción\nA1,Aspirina,10\nB2,Ibuprofeno,20\nX9,Paracetamol,12\nY1,Omeprazol,14.8\n";
const BASE_CSV: &str = "CodEstab,CodProd,Precio 2,Precio 1\n21870,A1,10,100\n";

fn session() -> Session {
    Session::new(AppConfig {
        catalog_header_offset: 0,
        ..AppConfig::default()
    })
}

fn loaded_session() -> Session {
    let mut session = session();
    session.dispatch(Event::UploadCatalog(Upload::new(
        "catalogo.csv",
        CATALOG_CSV.as_bytes().to_vec(),
    )));
    session.dispatch(Event::UploadBase(Upload::new(
        "base.csv",
        BASE_CSV.as_bytes().to_vec(),
    )));
    session
}

fn base(session: &Session) -> &BaseTable {
    session.base().expect("base should be loaded")
}

fn codes(session: &Session) -> Vec<String> {
    base(session)
        .rows()
        .iter()
        .map(|row| row.product_code.clone())
        .collect()
}

fn catalog_row(code: &str) -> Vec<String> {
    vec![code.to_string(), "Producto".to_string(), "1".to_string()]
}

#[test]
fn monthly_edit_walkthrough() {
    let mut session = loaded_session();
    assert_eq!(session.status().catalog, "Catálogo cargado: 4 productos");
    assert_eq!(session.status().base, "Base cargada: 1 filas");
    assert_eq!(base(&session).rows()[0].establishment_code, "0021870");

    session.dispatch(Event::DropdownChanged(Some("B2".to_string())));
    assert_eq!(session.unit_count(), Some(20.0));
    session.dispatch(Event::UnitPriceChanged(Some(5.0)));
    assert_eq!(session.total(), Total::Value(100.0));
    assert_eq!(session.total().display(), "Total: 100.00");

    let outcome = session.dispatch(Event::AddProduct);
    assert!(outcome.touched(Cell::Base));
    assert_eq!(session.status().update, BASE_UPDATED_MESSAGE);
    let b2 = base(&session).find("B2").expect("B2 should be added");
    assert_eq!((b2.unit_price, b2.box_price), (5.0, 100.0));
    assert_eq!(b2.establishment_code, "0021870");

    session.dispatch(Event::BaseRowSelected(Some("A1".to_string())));
    session.dispatch(Event::OpenEdit);
    let draft = session.dialogs().edit.draft().expect("edit dialog should open");
    assert_eq!(draft.unit_price, Some(10.0));
    assert_eq!(draft.unit_count, Some(10.0));
    session.dispatch(Event::EditUnitPriceChanged(Some(12.0)));
    session.dispatch(Event::EditUnitCountChanged(Some(8.0)));
    session.dispatch(Event::ConfirmEdit);
    assert!(!session.dialogs().edit.is_open());
    let a1 = base(&session).find("A1").expect("A1 should remain");
    assert_eq!((a1.unit_price, a1.box_price), (12.0, 96.0));

    session.dispatch(Event::BaseRowSelected(Some("B2".to_string())));
    session.dispatch(Event::OpenDelete);
    assert!(session.dialogs().delete.is_open());
    session.dispatch(Event::ConfirmDelete);
    assert!(!session.dialogs().delete.is_open());
    assert_eq!(codes(&session), vec!["A1"]);
    assert_eq!(session.base_selection(), None);
}

#[test]
fn grid_click_wins_over_dropdown_in_same_cycle() {
    let mut session = loaded_session();
    session.dispatch(Event::DropdownChanged(Some("Y1".to_string())));

    session.dispatch_cycle(vec![
        Event::CatalogRowSelected(Some(catalog_row("X9"))),
        Event::DropdownChanged(Some("Y1".to_string())),
    ]);

    assert_eq!(session.selection().code(), Some("X9"));
    assert_eq!(session.selection().dropdown_code.as_deref(), Some("X9"));
    assert_eq!(session.selection_status(), "Seleccionaste: X9");
    assert_eq!(session.unit_count(), Some(12.0));
}

#[test]
fn autofill_truncates_fraction_and_typed_count_wins() {
    let mut session = loaded_session();

    session.dispatch(Event::DropdownChanged(Some("Y1".to_string())));
    assert_eq!(session.unit_count(), Some(14.0));

    session.dispatch_cycle(vec![
        Event::DropdownChanged(Some("A1".to_string())),
        Event::UnitCountChanged(Some(3.0)),
    ]);
    assert_eq!(session.unit_count(), Some(3.0));
}

#[test]
fn total_reports_waiting_and_invalid_states() {
    let mut session = session();
    assert_eq!(session.total(), Total::WaitingForInput);

    session.dispatch(Event::UnitPriceChanged(Some(-1.0)));
    assert_eq!(session.total(), Total::WaitingForInput);

    let outcome = session.dispatch(Event::UnitCountChanged(Some(4.0)));
    assert!(outcome.touched(Cell::Total));
    assert_eq!(session.total(), Total::InvalidValues);

    session.dispatch(Event::UnitPriceChanged(Some(1.333)));
    assert_eq!(session.total(), Total::Value(5.33));
}

#[test]
fn add_without_base_creates_canonical_table() {
    let mut session = session();
    session.dispatch(Event::DropdownChanged(Some("00123".to_string())));
    session.dispatch_cycle(vec![
        Event::UnitPriceChanged(Some(5.0)),
        Event::UnitCountChanged(Some(20.0)),
    ]);

    session.dispatch(Event::AddProduct);

    let table = base(&session);
    assert_eq!(
        table.columns(),
        vec![ESTABLISHMENT_COLUMN, PRODUCT_COLUMN, "Precio 2", "Precio 1"]
    );
    assert_eq!(session.base_rows(), vec![vec!["0021870", "00123", "5.00", "100.00"]]);
}

#[test]
fn duplicate_add_reports_and_keeps_table() {
    let mut session = loaded_session();
    let version = session.base_version();
    session.dispatch(Event::DropdownChanged(Some("A1".to_string())));
    session.dispatch(Event::UnitPriceChanged(Some(2.0)));

    session.dispatch(Event::AddProduct);

    assert_eq!(session.status().update, "A1 ya existe en la base");
    assert_eq!(session.base_version(), version);
    assert_eq!(codes(&session), vec!["A1"]);
}

#[test]
fn dialogs_need_a_selected_base_row() {
    let mut session = loaded_session();

    let outcome = session.dispatch_cycle(vec![Event::OpenEdit, Event::OpenDelete]);

    assert!(!outcome.touched(Cell::EditDialog));
    assert!(!outcome.touched(Cell::DeleteDialog));
    assert!(!session.dialogs().edit.is_open());
    assert!(!session.dialogs().delete.is_open());
}

#[test]
fn failed_edit_still_closes_dialog() {
    let mut session = loaded_session();
    session.dispatch(Event::BaseRowSelected(Some("A1".to_string())));
    session.dispatch(Event::OpenEdit);
    session.dispatch(Event::EditUnitPriceChanged(None));
    let before = base(&session).clone();

    session.dispatch(Event::ConfirmEdit);

    assert!(!session.dialogs().edit.is_open());
    assert_eq!(session.status().update, "Valores inválidos: falta precio unitario");
    assert_eq!(base(&session), &before);
}

#[test]
fn confirm_without_open_dialog_is_ignored() {
    let mut session = loaded_session();
    session.dispatch(Event::BaseRowSelected(Some("A1".to_string())));
    let version = session.base_version();

    let outcome = session.dispatch_cycle(vec![Event::ConfirmEdit, Event::ConfirmDelete]);

    assert!(!outcome.touched(Cell::Base));
    assert_eq!(session.base_version(), version);
    assert_eq!(codes(&session), vec!["A1"]);
}

#[test]
fn rejected_upload_keeps_previous_tables() {
    let mut session = loaded_session();
    let catalog_version = session.catalog_version();
    let base_version = session.base_version();

    session.dispatch(Event::UploadBase(Upload::new(
        "base.csv",
        b"Codigo,Precio\nA1,1\n".to_vec(),
    )));
    session.dispatch(Event::UploadCatalog(Upload::new(
        "catalogo.csv",
        b"Nombre\nAspirina\n".to_vec(),
    )));

    assert!(session.status().base.contains("CodProd"));
    assert!(session.status().catalog.contains("Cod_Prod"));
    assert_eq!(session.base_version(), base_version);
    assert_eq!(session.catalog_version(), catalog_version);
    assert_eq!(codes(&session), vec!["A1"]);
    assert_eq!(session.dropdown_options().len(), 4);
}

#[test]
fn base_upload_drops_stale_row_selection() {
    let mut session = loaded_session();
    session.dispatch(Event::BaseRowSelected(Some("A1".to_string())));

    session.dispatch(Event::UploadBase(Upload::new(
        "base.csv",
        b"CodProd,Precio 2,Precio 1\nZ5,1,6\n".to_vec(),
    )));

    assert_eq!(session.base_selection(), None);
    assert_eq!(base(&session).rows()[0].establishment_code, "0021870");
}

#[test]
fn csv_export_reloads_with_leading_zeros() {
    let mut session = session();
    session.dispatch(Event::UploadBase(Upload::new(
        "base.csv",
        b"CodEstab,CodProd,Precio 2,Precio 1,Laboratorio\n21870,00123,5,100,Bayer\n".to_vec(),
    )));

    let outcome = session.dispatch(Event::ExportCsv);
    let download = outcome.downloads.first().expect("csv should be produced");
    assert!(download.file_name.starts_with("base_"));
    assert!(download.file_name.ends_with(".csv"));

    let mut reloaded = self::session();
    reloaded.dispatch(Event::UploadBase(Upload::new(
        download.file_name.clone(),
        download.bytes.clone(),
    )));

    assert_eq!(reloaded.base_rows(), session.base_rows());
    assert_eq!(
        reloaded.base_rows(),
        vec![vec!["0021870", "00123", "5.00", "100.00", "Bayer"]]
    );
}

#[test]
fn spreadsheet_export_reloads_as_base() {
    let mut session = loaded_session();
    session.dispatch(Event::DropdownChanged(Some("B2".to_string())));
    session.dispatch(Event::UnitPriceChanged(Some(5.0)));
    session.dispatch(Event::AddProduct);

    let outcome = session.dispatch(Event::ExportSpreadsheet);
    let download = outcome.downloads.first().expect("workbook should be produced");

    let mut reloaded = self::session();
    reloaded.dispatch(Event::UploadBase(Upload::new(
        download.file_name.clone(),
        download.bytes.clone(),
    )));

    assert_eq!(reloaded.base_rows(), session.base_rows());
}

#[test]
fn exporting_nothing_produces_no_download() {
    let mut session = session();

    let outcome = session.dispatch_cycle(vec![Event::ExportSpreadsheet, Event::ExportCsv]);

    assert!(outcome.downloads.is_empty());
    assert!(outcome.changed.is_empty());
}

#[test]
fn reset_clears_tables_but_keeps_config() {
    let mut session = loaded_session();

    session.reset();

    assert!(session.catalog().is_none());
    assert!(session.base().is_none());
    assert_eq!(session.config().catalog_header_offset, 0);
}

#[test]
fn csv_catalog_header_sits_below_report_preamble() {
    let mut session = Session::new(AppConfig::default());
    let preamble = "Farmacia Central\n\nReporte de precios,2026-10\n\n\nGenerado por sistema\n";

    session.dispatch(Event::UploadCatalog(Upload::new(
        "catalogo.csv",
        format!("{preamble}{CATALOG_CSV}").into_bytes(),
    )));

    assert_eq!(session.status().catalog, "Catálogo cargado: 4 productos");
    assert_eq!(session.dropdown_options(), vec!["A1", "B2", "X9", "Y1"]);
    session.dispatch(Event::DropdownChanged(Some("B2".to_string())));
    assert_eq!(session.unit_count(), Some(20.0));
}
