// Copyright 2025 the Plotir Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `plotir_core`: prints the element operations of a scripted update
//! sequence.

use plotir_core::{
    ElementHost, ElementKey, ElementOp, ElementStore, Role, SeriesDescriptor, SeriesIndex,
    StoreError, TraceKind, Visibility,
};

/// Host that names nodes after their key and creation order.
#[derive(Debug, Default)]
struct PrintHost {
    created: u32,
}

impl ElementHost for PrintHost {
    type Node = String;

    fn create(
        &mut self,
        key: ElementKey,
        _series: &SeriesDescriptor,
        before: Option<&String>,
    ) -> String {
        self.created += 1;
        let name = format!("{}#{}", key.role.class_name(), self.created);
        match before {
            Some(b) => println!("    host: insert {name} before {b}"),
            None => println!("    host: append {name}"),
        }
        name
    }

    fn update(&mut self, _key: ElementKey, node: &mut String, _series: &SeriesDescriptor) {
        println!("    host: refresh {node}");
    }

    fn destroy(&mut self, _key: ElementKey, node: String) {
        println!("    host: remove {node}");
    }
}

fn area(index: u32, visibility: Visibility) -> SeriesDescriptor {
    let fill = if index == 0 {
        Role::FillToZero
    } else {
        Role::FillToNext
    };
    SeriesDescriptor::new(SeriesIndex(index), TraceKind::Scatter)
        .with_visibility(visibility)
        .with_role(fill)
        .with_role(Role::Line)
}

fn main() -> Result<(), StoreError> {
    let mut store = ElementStore::new();
    let mut host = PrintHost::default();

    let steps = [
        ("plot", [Visibility::Visible, Visibility::Visible]),
        ("hide series 1", [Visibility::Visible, Visibility::Hidden]),
        ("show series 1", [Visibility::Visible, Visibility::Visible]),
        ("hide series 0", [Visibility::Hidden, Visibility::Visible]),
        ("show series 0", [Visibility::Visible, Visibility::Visible]),
        ("hide all", [Visibility::Hidden, Visibility::Hidden]),
        ("hide all again", [Visibility::Hidden, Visibility::Hidden]),
    ];

    for (step, [v0, v1]) in steps {
        println!("{step}:");
        let series = [area(0, v0), area(1, v1)];
        let ops = store.sync(&series, &mut host)?;
        print_ops(&ops);
        println!("  live: {}", store.len());
    }
    Ok(())
}

fn print_ops(ops: &[ElementOp]) {
    if ops.is_empty() {
        println!("  (no ops)");
    }
    for op in ops {
        match op {
            ElementOp::Create { key } => println!("  Create  {key:?} raw={:#x}", key.to_raw()),
            ElementOp::Update { key } => println!("  Update  {key:?}"),
            ElementOp::Destroy { key } => println!("  Destroy {key:?}"),
        }
    }
}
