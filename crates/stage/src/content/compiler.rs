use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::play::{LayoutTable, Vec2};
use crate::AppPaths;

use super::types::{KrakenDef, MeterDef, PresentationDefs, SceneLayout, TimingDef, BOARD_SIZE,
    METER_SECTOR_COUNT};

pub const DEFS_FILE_NAME: &str = "presentation.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    DuplicateDef,
    MissingDef,
}

#[derive(Debug, Clone)]
pub struct ContentCompileError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentCompileError {}

pub fn load_presentation_defs(app_paths: &AppPaths) -> Result<PresentationDefs, ContentCompileError> {
    let file_path = app_paths.defs_dir.join(DEFS_FILE_NAME);
    let raw = fs::read_to_string(&file_path).map_err(|error| ContentCompileError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read defs file: {error}"),
        file_path: file_path.clone(),
        location: None,
    })?;
    compile_presentation_defs(&file_path, &raw)
}

pub fn compile_presentation_defs(
    file_path: &Path,
    raw: &str,
) -> Result<PresentationDefs, ContentCompileError> {
    let doc = Document::parse(raw).map_err(|error| ContentCompileError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Defs" {
        return Err(error_at_node(
            ContentErrorCode::InvalidRoot,
            "root element must be <Defs>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    let mut regular_meter: Option<MeterDef> = None;
    let mut bonus_meter: Option<MeterDef> = None;
    let mut timing: Option<TimingDef> = None;
    let mut kraken: Option<KrakenDef> = None;
    let mut desktop: Option<SceneLayout> = None;
    let mut mobile_landscape: Option<SceneLayout> = None;
    let mut mobile_portrait: Option<SceneLayout> = None;

    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "MeterDef" => {
                let (mode, meter) = parse_meter_def(file_path, &doc, child)?;
                let slot = match mode.as_str() {
                    "regular" => &mut regular_meter,
                    "bonus" => &mut bonus_meter,
                    other => {
                        return Err(error_at_node(
                            ContentErrorCode::InvalidValue,
                            format!("invalid meter mode '{}'; allowed values: regular, bonus", other),
                            file_path,
                            &doc,
                            child,
                        ))
                    }
                };
                if slot.replace(meter).is_some() {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        format!("duplicate <MeterDef> for mode '{mode}'"),
                        file_path,
                        &doc,
                        child,
                    ));
                }
            }
            "TimingDef" => {
                let parsed = parse_timing_def(file_path, &doc, child)?;
                if timing.replace(parsed).is_some() {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        "duplicate <TimingDef>".to_string(),
                        file_path,
                        &doc,
                        child,
                    ));
                }
            }
            "KrakenDef" => {
                let parsed = parse_kraken_def(file_path, &doc, child)?;
                if kraken.replace(parsed).is_some() {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        "duplicate <KrakenDef>".to_string(),
                        file_path,
                        &doc,
                        child,
                    ));
                }
            }
            "LayoutDef" => {
                let (capability, layout) = parse_layout_def(file_path, &doc, child)?;
                let slot = match capability.as_str() {
                    "desktop" => &mut desktop,
                    "mobile-landscape" => &mut mobile_landscape,
                    "mobile-portrait" => &mut mobile_portrait,
                    other => {
                        return Err(error_at_node(
                            ContentErrorCode::InvalidValue,
                            format!(
                                "invalid capability '{}'; allowed values: desktop, mobile-landscape, mobile-portrait",
                                other
                            ),
                            file_path,
                            &doc,
                            child,
                        ))
                    }
                };
                if slot.replace(layout).is_some() {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        format!("duplicate <LayoutDef> for capability '{capability}'"),
                        file_path,
                        &doc,
                        child,
                    ));
                }
            }
            other => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownDefType,
                    format!(
                        "unsupported def type <{}>; supported: MeterDef, TimingDef, KrakenDef, LayoutDef",
                        other
                    ),
                    file_path,
                    &doc,
                    child,
                ))
            }
        }
    }

    let missing_def = |what: &str| ContentCompileError {
        code: ContentErrorCode::MissingDef,
        message: format!("missing required def: {what}"),
        file_path: file_path.to_path_buf(),
        location: None,
    };

    Ok(PresentationDefs {
        regular_meter: regular_meter.ok_or_else(|| missing_def("<MeterDef> with mode 'regular'"))?,
        bonus_meter: bonus_meter.ok_or_else(|| missing_def("<MeterDef> with mode 'bonus'"))?,
        timing: timing.unwrap_or_default(),
        kraken: kraken.unwrap_or_default(),
        layout: LayoutTable {
            desktop: desktop.ok_or_else(|| missing_def("<LayoutDef> for 'desktop'"))?,
            mobile_landscape: mobile_landscape
                .ok_or_else(|| missing_def("<LayoutDef> for 'mobile-landscape'"))?,
            mobile_portrait: mobile_portrait
                .ok_or_else(|| missing_def("<LayoutDef> for 'mobile-portrait'"))?,
        },
        board_size: BOARD_SIZE,
    })
}

fn parse_meter_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<(String, MeterDef), ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut mode: Option<String> = None;
    let mut inner_sectors: Option<[u32; METER_SECTOR_COUNT]> = None;
    let mut outer_sectors: Option<[u32; METER_SECTOR_COUNT]> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{}> in <MeterDef>", field_name),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "mode" => {
                mode = Some(required_text(file_path, doc, field, "mode")?);
            }
            "innerSectors" => {
                inner_sectors = Some(parse_sector_list(file_path, doc, field, "innerSectors")?);
            }
            "outerSectors" => {
                outer_sectors = Some(parse_sector_list(file_path, doc, field, "outerSectors")?);
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{}> in <MeterDef>", field_name),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(mode) = mode else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <mode> in <MeterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(inner_sectors) = inner_sectors else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <innerSectors> in <MeterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(outer_sectors) = outer_sectors else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <outerSectors> in <MeterDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };

    Ok((
        mode,
        MeterDef {
            inner_sectors,
            outer_sectors,
        },
    ))
}

fn parse_timing_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<TimingDef, ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut timing = TimingDef::default();

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{}> in <TimingDef>", field_name),
                file_path,
                doc,
                field,
            ));
        }

        let slot = match field_name.as_str() {
            "fillSeconds" => &mut timing.fill_seconds,
            "spinInSeconds" => &mut timing.spin_in_seconds,
            "refillSeconds" => &mut timing.refill_seconds,
            "payoutRevealSeconds" => &mut timing.payout_reveal_seconds,
            "payoutGapSeconds" => &mut timing.payout_gap_seconds,
            "bonusPayoutGapSeconds" => &mut timing.bonus_payout_gap_seconds,
            "wildBurstSeconds" => &mut timing.wild_burst_seconds,
            "kegDropSeconds" => &mut timing.keg_drop_seconds,
            "krakenIntroSeconds" => &mut timing.kraken_intro_seconds,
            "strikeSpacingSeconds" => &mut timing.strike_spacing_seconds,
            "strikeSplashOffsetSeconds" => &mut timing.strike_splash_offset_seconds,
            "strikeSpawnOffsetSeconds" => &mut timing.strike_spawn_offset_seconds,
            "strikeDurationSeconds" => &mut timing.strike_duration_seconds,
            "milestoneArmDelaySeconds" => &mut timing.milestone_arm_delay_seconds,
            "accumulateOffsetSeconds" => &mut timing.accumulate_offset_seconds,
            "bonusIntroSeconds" => &mut timing.bonus_intro_seconds,
            "bonusOutroSeconds" => &mut timing.bonus_outro_seconds,
            "fastFactor" => &mut timing.fast_factor,
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{}> in <TimingDef>", field_name),
                    file_path,
                    doc,
                    field,
                ))
            }
        };

        let value = parse_finite_f32(file_path, doc, field, &field_name)?;
        let lower_bound = if field_name == "fastFactor" { 1.0 } else { 0.0 };
        if value < lower_bound {
            return Err(error_at_node(
                ContentErrorCode::InvalidValue,
                format!("<{}> must be >= {}", field_name, lower_bound),
                file_path,
                doc,
                field,
            ));
        }
        *slot = value;
    }

    Ok(timing)
}

fn parse_kraken_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<KrakenDef, ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut kraken = KrakenDef::default();

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{}> in <KrakenDef>", field_name),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "stageSizes" => {
                let value = required_text(file_path, doc, field, "stageSizes")?;
                let mut sizes = Vec::new();
                for part in value.split(',') {
                    let parsed = part.trim().parse::<u32>().map_err(|_| {
                        error_at_node(
                            ContentErrorCode::InvalidValue,
                            format!("stageSizes entry '{}' is not a valid number", part.trim()),
                            file_path,
                            doc,
                            field,
                        )
                    })?;
                    if parsed == 0 {
                        return Err(error_at_node(
                            ContentErrorCode::InvalidValue,
                            "stageSizes entries must be > 0".to_string(),
                            file_path,
                            doc,
                            field,
                        ));
                    }
                    sizes.push(parsed);
                }
                if sizes.is_empty() {
                    return Err(error_at_node(
                        ContentErrorCode::InvalidValue,
                        "stageSizes must list at least one stage".to_string(),
                        file_path,
                        doc,
                        field,
                    ));
                }
                kraken.stage_sizes = sizes;
            }
            "maxMinionHp" => {
                let value = required_text(file_path, doc, field, "maxMinionHp")?;
                let parsed = value.parse::<u8>().ok().filter(|hp| (1..=8).contains(hp));
                let Some(parsed) = parsed else {
                    return Err(error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!("maxMinionHp '{}' must be an integer in 1..=8", value),
                        file_path,
                        doc,
                        field,
                    ));
                };
                kraken.max_minion_hp = parsed;
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{}> in <KrakenDef>", field_name),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    Ok(kraken)
}

fn parse_layout_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<(String, SceneLayout), ContentCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut capability: Option<String> = None;
    let mut meter_anchor = Vec2::default();
    let mut meter_scale = 1.0f32;
    let mut kraken_panel_anchor = Vec2::default();
    let mut kraken_panel_scale = 1.0f32;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{}> in <LayoutDef>", field_name),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "capability" => {
                capability = Some(required_text(file_path, doc, field, "capability")?);
            }
            "meterAnchorX" => meter_anchor.x = parse_finite_f32(file_path, doc, field, &field_name)?,
            "meterAnchorY" => meter_anchor.y = parse_finite_f32(file_path, doc, field, &field_name)?,
            "meterScale" => meter_scale = parse_finite_f32(file_path, doc, field, &field_name)?,
            "krakenPanelAnchorX" => {
                kraken_panel_anchor.x = parse_finite_f32(file_path, doc, field, &field_name)?
            }
            "krakenPanelAnchorY" => {
                kraken_panel_anchor.y = parse_finite_f32(file_path, doc, field, &field_name)?
            }
            "krakenPanelScale" => {
                kraken_panel_scale = parse_finite_f32(file_path, doc, field, &field_name)?
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{}> in <LayoutDef>", field_name),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(capability) = capability else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <capability> in <LayoutDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    if meter_scale <= 0.0 || kraken_panel_scale <= 0.0 {
        return Err(error_at_node(
            ContentErrorCode::InvalidValue,
            "layout scales must be > 0".to_string(),
            file_path,
            doc,
            node,
        ));
    }

    Ok((
        capability,
        SceneLayout {
            meter_anchor,
            meter_scale,
            kraken_panel_anchor,
            kraken_panel_scale,
        },
    ))
}

fn parse_sector_list(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<[u32; METER_SECTOR_COUNT], ContentCompileError> {
    let value = required_text(file_path, doc, node, field_name)?;
    let mut sectors = [0u32; METER_SECTOR_COUNT];
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != METER_SECTOR_COUNT {
        return Err(error_at_node(
            ContentErrorCode::InvalidValue,
            format!(
                "<{}> must list exactly {} sector widths, got {}",
                field_name,
                METER_SECTOR_COUNT,
                parts.len()
            ),
            file_path,
            doc,
            node,
        ));
    }
    for (slot, part) in sectors.iter_mut().zip(parts) {
        let parsed = part.parse::<u32>().map_err(|_| {
            error_at_node(
                ContentErrorCode::InvalidValue,
                format!("sector width '{}' is not a valid number", part),
                file_path,
                doc,
                node,
            )
        })?;
        if parsed == 0 {
            return Err(error_at_node(
                ContentErrorCode::InvalidValue,
                format!("<{}> sector widths must be > 0", field_name),
                file_path,
                doc,
                node,
            ));
        }
        *slot = parsed;
    }
    Ok(sectors)
}

fn parse_finite_f32(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<f32, ContentCompileError> {
    let value = required_text(file_path, doc, node, field_name)?;
    let parsed = value.parse::<f32>().map_err(|_| {
        error_at_node(
            ContentErrorCode::InvalidValue,
            format!("<{}> value '{}' is not a valid number", field_name, value),
            file_path,
            doc,
            node,
        )
    })?;
    if !parsed.is_finite() {
        return Err(error_at_node(
            ContentErrorCode::InvalidValue,
            format!("<{}> must be finite", field_name),
            file_path,
            doc,
            node,
        ));
    }
    Ok(parsed)
}

fn required_text(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, ContentCompileError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            format!("field <{}> must not be empty", field_name),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: ContentErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> ContentCompileError {
    let pos = doc.text_pos_at(node.range().start);
    ContentCompileError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn layout_block(capability: &str) -> String {
        format!(
            "<LayoutDef>\
               <capability>{capability}</capability>\
               <meterAnchorX>345</meterAnchorX>\
               <meterAnchorY>70</meterAnchorY>\
               <meterScale>1</meterScale>\
               <krakenPanelAnchorX>125</krakenPanelAnchorX>\
               <krakenPanelAnchorY>247</krakenPanelAnchorY>\
               <krakenPanelScale>1</krakenPanelScale>\
             </LayoutDef>"
        )
    }

    fn valid_defs_xml() -> String {
        format!(
            "<Defs>\
               <MeterDef>\
                 <mode>regular</mode>\
                 <innerSectors>10,15,20,25</innerSectors>\
                 <outerSectors>30,40,50,60</outerSectors>\
               </MeterDef>\
               <MeterDef>\
                 <mode>bonus</mode>\
                 <innerSectors>25,20,15,10</innerSectors>\
                 <outerSectors>30,30,30,30</outerSectors>\
               </MeterDef>\
               <TimingDef><fillSeconds>1.012</fillSeconds></TimingDef>\
               <KrakenDef><stageSizes>4,5,6</stageSizes><maxMinionHp>4</maxMinionHp></KrakenDef>\
               {}{}{}\
             </Defs>",
            layout_block("desktop"),
            layout_block("mobile-landscape"),
            layout_block("mobile-portrait"),
        )
    }

    fn compile(raw: &str) -> Result<PresentationDefs, ContentCompileError> {
        compile_presentation_defs(&PathBuf::from("presentation.xml"), raw)
    }

    #[test]
    fn compiles_a_complete_defs_file() {
        let defs = compile(&valid_defs_xml()).expect("defs");
        assert_eq!(defs.regular_meter.inner_capacity(), 70);
        assert_eq!(defs.bonus_meter.inner_sectors, [25, 20, 15, 10]);
        assert_eq!(defs.kraken.stage_sizes, vec![4, 5, 6]);
        assert!((defs.timing.fill_seconds - 1.012).abs() < 1e-6);
        assert_eq!(defs.board_size, 42);
        assert_eq!(defs.milestone_count(), 4);
    }

    #[test]
    fn missing_bonus_meter_is_a_missing_def() {
        let raw = valid_defs_xml().replace("<mode>bonus</mode>", "<mode>regular</mode>");
        // The second regular def now collides before the missing def is seen.
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::DuplicateDef);

        let raw = valid_defs_xml().replacen(
            "<MeterDef>\
               <mode>bonus</mode>\
               <innerSectors>25,20,15,10</innerSectors>\
               <outerSectors>30,30,30,30</outerSectors>\
             </MeterDef>",
            "",
            1,
        );
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::MissingDef);
    }

    #[test]
    fn malformed_xml_carries_a_location() {
        let error = compile("<Defs><MeterDef>").expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::XmlMalformed);
        assert!(error.location.is_some());
    }

    #[test]
    fn wrong_sector_count_is_invalid() {
        let raw = valid_defs_xml().replace("10,15,20,25", "10,15,20");
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::InvalidValue);
        assert!(error.message.contains("exactly 4"));
    }

    #[test]
    fn zero_sector_width_is_invalid() {
        let raw = valid_defs_xml().replace("10,15,20,25", "0,15,20,25");
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::InvalidValue);
    }

    #[test]
    fn unknown_def_type_is_reported_with_location() {
        let raw = valid_defs_xml().replace("<TimingDef>", "<SpeedDef>");
        let error = compile(&raw.replace("</TimingDef>", "</SpeedDef>")).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::UnknownDefType);
        assert!(error.location.is_some());
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let raw = valid_defs_xml().replace(
            "<mode>regular</mode>",
            "<mode>regular</mode><mode>regular</mode>",
        );
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::DuplicateField);
    }

    #[test]
    fn fast_factor_below_one_is_invalid() {
        let raw = valid_defs_xml().replace(
            "<fillSeconds>1.012</fillSeconds>",
            "<fastFactor>0.5</fastFactor>",
        );
        let error = compile(&raw).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::InvalidValue);
    }

    #[test]
    fn timing_and_kraken_defs_are_optional() {
        let raw = format!(
            "<Defs>\
               <MeterDef>\
                 <mode>regular</mode>\
                 <innerSectors>10,15,20,25</innerSectors>\
                 <outerSectors>30,40,50,60</outerSectors>\
               </MeterDef>\
               <MeterDef>\
                 <mode>bonus</mode>\
                 <innerSectors>25,20,15,10</innerSectors>\
                 <outerSectors>30,30,30,30</outerSectors>\
               </MeterDef>\
               {}{}{}\
             </Defs>",
            layout_block("desktop"),
            layout_block("mobile-landscape"),
            layout_block("mobile-portrait"),
        );
        let defs = compile(&raw).expect("defs");
        assert_eq!(defs.timing, TimingDef::default());
        assert_eq!(defs.kraken, KrakenDef::default());
    }

    #[test]
    fn load_reads_defs_from_app_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let defs_dir = dir.path().join("assets").join("defs");
        fs::create_dir_all(&defs_dir).expect("create defs dir");
        fs::write(defs_dir.join(DEFS_FILE_NAME), valid_defs_xml()).expect("write defs");

        let paths = crate::AppPaths {
            root: dir.path().to_path_buf(),
            defs_dir,
            rounds_dir: dir.path().join("assets").join("rounds"),
        };
        let defs = load_presentation_defs(&paths).expect("defs");
        assert_eq!(defs.regular_meter.milestone_thresholds(), [10, 25, 45, 70]);
    }

    #[test]
    fn load_reports_missing_file_as_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = crate::AppPaths {
            root: dir.path().to_path_buf(),
            defs_dir: dir.path().join("assets").join("defs"),
            rounds_dir: dir.path().join("assets").join("rounds"),
        };
        let error = load_presentation_defs(&paths).expect_err("must fail");
        assert_eq!(error.code, ContentErrorCode::ReadFile);
    }
}
