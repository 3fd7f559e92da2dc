use flow::errors::FlowError;
use flow::{InMemoryProcessStore, ProcessService, StepDefinition, TransitionTable};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<(), FlowError> {
    // Tabla de tres pasos: el 20 se salta cuando el paso 10 indica "full"
    let table = TransitionTable::new(vec![StepDefinition::new(10, "scan_box"),
                                          StepDefinition::new(20, "enter_quantity").skip_when(30, |p| {
                                                                                        p.field(10, "full").and_then(|v| v.as_bool())
                                                                                    }),
                                          StepDefinition::new(30, "validate"),])?;
    let service = ProcessService::new(Arc::new(InMemoryProcessStore::default()), Arc::new(table));

    let view = service.view("example");
    println!("paso activo: {:?}", view.decision());

    let data = json!({"box": "BOX-001", "full": false}).as_object().cloned().unwrap_or_default();
    let view = service.submit("example", 10, data)?;
    println!("tras el paso 10: {:?}", view.decision());

    let data = json!({"quantity": 4}).as_object().cloned().unwrap_or_default();
    let view = service.submit("example", 20, data)?;
    println!("tras el paso 20: {:?}", view.decision());
    println!("proceso persistido: {}", view.process.to_json());

    // volver atrás desde el paso activo
    let view = service.back("example", 30)?;
    println!("tras retroceder: {:?}", view.decision());

    service.reset("example")?;
    Ok(())
}
