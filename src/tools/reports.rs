//! Report generation tools
//!
//! Generate a PDF progress report with a weight trend chart, win-score
//! history, and streak summary for a date range.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;
use serde::Serialize;

use crate::db::Database;
use crate::metabolic::{calculate_nutrition_goals, compute_streaks, compute_weekly_aggregate};
use crate::models::{DailyGoal, MealEntry, Profile, User, WeightEntry};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 192); // Blue for report title
const COLOR_GOOD: (u8, u8, u8) = (0, 176, 80); // Green
const COLOR_WARN: (u8, u8, u8) = (255, 165, 0); // Orange
const COLOR_BAD: (u8, u8, u8) = (255, 0, 0); // Red
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProgressReportResponse {
    pub success: bool,
    pub file_path: String,
    pub weight_entries: i64,
    pub goal_days: i64,
    pub date_range: String,
    pub message: String,
}

// ============================================================================
// Classification
// ============================================================================

/// Color a win score for the history table
fn classify_win_score(score: u8) -> (u8, u8, u8) {
    if score >= 5 {
        COLOR_GOOD
    } else if score >= 3 {
        COLOR_GOOD
    } else if score >= 1 {
        COLOR_WARN
    } else {
        COLOR_BAD
    }
}

fn day_of_week_abbrev(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Generate the weight trend chart as PNG bytes
pub fn generate_weight_chart(
    entries: &[WeightEntry],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if entries.is_empty() {
        return Err("No data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let y_min = entries
            .iter()
            .map(|e| e.weight_lb)
            .fold(f64::INFINITY, f64::min)
            - 2.0;
        let y_max = entries
            .iter()
            .map(|e| e.weight_lb)
            .fold(f64::NEG_INFINITY, f64::max)
            + 2.0;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..(entries.len() as i32), y_min..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(entries.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < entries.len() {
                    let date = &entries[*x as usize].date;
                    date.split('-').skip(1).collect::<Vec<_>>().join("/")
                } else {
                    String::new()
                }
            })
            .y_desc("lb")
            .draw()
            .map_err(|e| e.to_string())?;

        let points: Vec<(i32, f64)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i as i32, e.weight_lb))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), BLUE.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Weight")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())),
            )
            .map_err(|e| e.to_string())?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y1), false), (Point::new(x2, y2), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Progress Report Generation
// ============================================================================

/// Generate a weight-loss progress PDF report
pub fn generate_progress_report(
    db: &Database,
    user_id: i64,
    start_date: &str,
    end_date: &str,
    output_path: &str,
) -> Result<ProgressReportResponse, String> {
    let conn = db.get_conn().map_err(|e| e.to_string())?;

    let user = User::get_by_id(&conn, user_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("User not found with id: {}", user_id))?;

    let weights = WeightEntry::history(&conn, user_id, Some(start_date), Some(end_date))
        .map_err(|e| e.to_string())?;
    let goals = DailyGoal::window_descending(&conn, user_id, start_date, end_date)
        .map_err(|e| e.to_string())?;
    let meals = MealEntry::list_for_range(&conn, user_id, start_date, end_date)
        .map_err(|e| e.to_string())?;
    let nutrition_goals = Profile::get(&conn, user_id)
        .map_err(|e| e.to_string())?
        .and_then(|p| p.metrics())
        .map(|m| calculate_nutrition_goals(&m));

    if weights.is_empty() && goals.is_empty() {
        return Err(format!(
            "No weight entries or goal records found between {} and {}",
            start_date, end_date
        ));
    }

    let flags: Vec<_> = goals.iter().map(|g| g.flags).collect();
    let streaks = compute_streaks(&flags);
    let aggregate = compute_weekly_aggregate(&flags);

    let weight_change = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) => Some(first.weight_lb - last.weight_lb),
        _ => None,
    };

    // Create PDF - Page 1 Portrait
    let (doc, page1, layer1) = PdfDocument::new(
        "Progress Report",
        Mm(215.9), // Letter width
        Mm(279.4), // Letter height
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let layer = doc.get_page(page1).get_layer(layer1);

    // Page 1 dimensions (Portrait)
    let page_height = 279.4;
    let margin_left = 15.0;
    let mut y = page_height - 20.0;

    // Title
    add_text(
        &layer,
        &font_bold,
        "Weight Loss Progress Report",
        Mm(margin_left),
        Mm(y),
        18.0,
        COLOR_TITLE,
    );
    y -= 10.0;

    // User info
    add_text(
        &layer,
        &font,
        &format!("User: {}", user.name),
        Mm(margin_left),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    let now = chrono::Local::now().format("%Y-%m-%d").to_string();
    add_text(
        &layer,
        &font,
        &format!("Generated: {}", now),
        Mm(120.0),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 6.0;

    add_text(
        &layer,
        &font,
        &format!("Report Period: {} to {}", start_date, end_date),
        Mm(margin_left),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 10.0;

    // Horizontal line
    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    // Summary section
    add_text(&layer, &font_bold, "Summary", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;

    if let (Some(first), Some(last)) = (weights.first(), weights.last()) {
        add_text(
            &layer,
            &font,
            &format!("Starting Weight: {:.1} lb ({})", first.weight_lb, first.date),
            Mm(margin_left),
            Mm(y),
            10.0,
            COLOR_BLACK,
        );
        add_text(
            &layer,
            &font,
            &format!("Latest Weight: {:.1} lb ({})", last.weight_lb, last.date),
            Mm(110.0),
            Mm(y),
            10.0,
            COLOR_BLACK,
        );
        y -= 6.0;
    }

    if let Some(change) = weight_change {
        let (label, color) = if change >= 0.0 {
            (format!("Total Lost: {:.1} lb", change), COLOR_GOOD)
        } else {
            (format!("Total Gained: {:.1} lb", -change), COLOR_BAD)
        };
        add_text(&layer, &font, &label, Mm(margin_left), Mm(y), 10.0, color);
    }
    add_text(
        &layer,
        &font,
        &format!("Weigh-ins: {}", weights.len()),
        Mm(110.0),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 6.0;

    add_text(
        &layer,
        &font,
        &format!(
            "Current Streak: {} days    Longest Streak: {} days",
            streaks.current_streak, streaks.longest_streak
        ),
        Mm(margin_left),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 6.0;

    add_text(
        &layer,
        &font,
        &format!(
            "Days Logged: {}    Average Win Score: {}/5",
            aggregate.days_logged, aggregate.average_win_score
        ),
        Mm(margin_left),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 12.0;

    // Nutrition section: goals vs actual intake over the logged days
    if !meals.is_empty() || nutrition_goals.is_some() {
        add_text(&layer, &font_bold, "Nutrition", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
        y -= 7.0;

        if let Some(ng) = &nutrition_goals {
            add_text(
                &layer,
                &font,
                &format!(
                    "Daily Goals: {} kcal, {} g protein, {} g carbs, {} g fat, {} g fiber",
                    ng.calories, ng.protein_g, ng.carbs_g, ng.fats_g, ng.fiber_g
                ),
                Mm(margin_left),
                Mm(y),
                10.0,
                COLOR_BLACK,
            );
            y -= 6.0;
        }

        if !meals.is_empty() {
            let logged_days = meals
                .iter()
                .map(|m| m.date.as_str())
                .collect::<std::collections::HashSet<_>>()
                .len();
            let days = logged_days.max(1) as f64;

            let total_calories: f64 = meals.iter().map(|m| m.calories).sum();
            let total_protein: f64 = meals.iter().map(|m| m.protein).sum();
            let total_carbs: f64 = meals.iter().map(|m| m.carbs).sum();
            let total_fats: f64 = meals.iter().map(|m| m.fats).sum();

            let avg_calories = total_calories / days;
            let calorie_color = match &nutrition_goals {
                Some(ng) if avg_calories <= ng.calories as f64 => COLOR_GOOD,
                Some(ng) if avg_calories <= ng.calories as f64 * 1.1 => COLOR_WARN,
                Some(_) => COLOR_BAD,
                None => COLOR_BLACK,
            };

            add_text(
                &layer,
                &font,
                &format!(
                    "Actual Average: {:.0} kcal, {:.0} g protein, {:.0} g carbs, {:.0} g fat ({} logged days)",
                    avg_calories,
                    total_protein / days,
                    total_carbs / days,
                    total_fats / days,
                    logged_days
                ),
                Mm(margin_left),
                Mm(y),
                10.0,
                calorie_color,
            );
            y -= 6.0;
        }

        y -= 6.0;
    }

    // Win score history table
    add_text(
        &layer,
        &font_bold,
        "Daily Win Scores",
        Mm(margin_left),
        Mm(y),
        12.0,
        COLOR_BLACK,
    );
    y -= 7.0;

    let col_widths = [26.0, 14.0, 14.0, 18.0, 18.0, 16.0, 20.0, 16.0];
    let headers = ["Date", "Day", "Score", "Meals", "Protein", "Fast", "Exercise", "Water"];

    let mut col_x = margin_left;
    for (i, header) in headers.iter().enumerate() {
        add_text(&layer, &font_bold, header, Mm(col_x), Mm(y), 8.0, COLOR_BLACK);
        col_x += col_widths[i];
    }
    y -= 5.0;

    let check = |flag: bool| if flag { "Y" } else { "-" };

    for goal in goals.iter() {
        col_x = margin_left;

        let parsed = NaiveDate::parse_from_str(&goal.date, "%Y-%m-%d").ok();
        let day = parsed.map(|d| day_of_week_abbrev(&d)).unwrap_or("---");
        let score_color = classify_win_score(goal.win_score);

        let values = [
            goal.date.clone(),
            day.to_string(),
            format!("{}/5", goal.win_score),
            check(goal.flags.meals_logged).to_string(),
            check(goal.flags.protein_goal_met).to_string(),
            check(goal.flags.fast_completed).to_string(),
            check(goal.flags.exercise_done).to_string(),
            check(goal.flags.water_goal_met).to_string(),
        ];

        for (i, value) in values.iter().enumerate() {
            let color = if i == 2 { score_color } else { COLOR_BLACK };
            add_text(&layer, &font, value, Mm(col_x), Mm(y), 7.0, color);
            col_x += col_widths[i];
        }
        y -= 4.5;
    }

    // ========================================================================
    // Page 2 - Landscape for Chart
    // ========================================================================
    if !weights.is_empty() {
        let (page2, layer2) = doc.add_page(Mm(279.4), Mm(215.9), "Chart Page"); // Landscape
        let layer2 = doc.get_page(page2).get_layer(layer2);

        let landscape_height = 215.9;
        let margin_left_p2 = 15.0;
        let mut y2 = landscape_height - 20.0;

        // Chart title
        add_text(
            &layer2,
            &font_bold,
            "Weight Trend",
            Mm(margin_left_p2),
            Mm(y2),
            16.0,
            COLOR_TITLE,
        );
        add_text(
            &layer2,
            &font,
            &format!("{} - {}", start_date, end_date),
            Mm(100.0),
            Mm(y2),
            11.0,
            COLOR_BLACK,
        );
        y2 -= 10.0;

        // Generate and embed chart
        match generate_weight_chart(&weights, 1000, 400) {
            Ok(png_bytes) => {
                let dynamic_image =
                    printpdf::image_crate::load_from_memory(&png_bytes).map_err(|e| e.to_string())?;
                let pdf_image = Image::from_dynamic_image(&dynamic_image);

                // 1000x400 pixels at 120 DPI = ~212mm x 85mm - fits well on landscape
                let transform = ImageTransform {
                    translate_x: Some(Mm(margin_left_p2)),
                    translate_y: Some(Mm(y2 - 90.0)),
                    dpi: Some(120.0),
                    ..Default::default()
                };

                pdf_image.add_to_layer(layer2.clone(), transform);
            }
            Err(e) => {
                add_text(
                    &layer2,
                    &font,
                    &format!("Chart generation error: {}", e),
                    Mm(margin_left_p2),
                    Mm(y2 - 10.0),
                    9.0,
                    COLOR_BAD,
                );
            }
        }
    }

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    Ok(ProgressReportResponse {
        success: true,
        file_path: output_path.to_string(),
        weight_entries: weights.len() as i64,
        goal_days: goals.len() as i64,
        date_range: format!("{} to {}", start_date, end_date),
        message: format!(
            "Progress report generated with {} weigh-ins and {} goal days",
            weights.len(),
            goals.len()
        ),
    })
}
