use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use table_editor_core::{
    Options, Point, TableCommand, TableEditor, TextBuffer, TextEditor, complete_table,
    format_table, read_table, shortest_edit_script,
};

fn large_table(rows: usize, columns: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows + 1);
    let header: Vec<String> = (0..columns).map(|j| format!("column {j}")).collect();
    lines.push(format!("| {} |", header.join(" | ")));
    for i in 0..rows {
        let cells: Vec<String> = (0..columns)
            .map(|j| match (i + j) % 3 {
                0 => format!("{i}"),
                1 => format!("cell {i}-{j}"),
                _ => "漢字テキスト".to_string(),
            })
            .collect();
        lines.push(format!("|{}|", cells.join("|")));
    }
    lines
}

fn bench_format_table(c: &mut Criterion) {
    let lines = large_table(1_000, 8);
    let options = Options::default();
    c.bench_function("format_table/1k_rows", |b| {
        b.iter(|| {
            let table = read_table(black_box(&lines), &options);
            let completed = complete_table(&table, &options);
            black_box(format_table(&completed.table, &options).table.height());
        })
    });
}

fn bench_edit_script(c: &mut Criterion) {
    let old = large_table(1_000, 8);
    let mut new = old.clone();
    new[500] = "| changed |".to_string();
    new.insert(700, "| inserted |".to_string());
    c.bench_function("edit_script/1k_lines_distance_2", |b| {
        b.iter(|| black_box(shortest_edit_script(black_box(&old), black_box(&new), 3)))
    });
}

fn bench_next_cell(c: &mut Criterion) {
    let lines = large_table(200, 6);
    let options = Options::default();
    c.bench_function("table_editor/next_cell_200_rows", |b| {
        b.iter_batched(
            || {
                let mut buffer = TextBuffer::from_lines(&lines);
                buffer.set_cursor_position(Point::new(100, 2));
                TableEditor::new(buffer)
            },
            |mut editor| {
                for _ in 0..10 {
                    editor.execute(TableCommand::NextCell, &options).unwrap();
                }
                black_box(editor.editor().cursor_position());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_format_table, bench_edit_script, bench_next_cell);
criterion_main!(benches);
