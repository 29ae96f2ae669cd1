//! Shared fixture builder for integration tests.
//!
//! Encodes a minimal ONNX model by hand so the tests need no checked-in
//! binary fixture: a single `Add(x, x)` node over a float32 `[1, 4]`
//! tensor, i.e. `y = 2 * x`.

fn varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out
}

fn varint_field(field: u64, value: u64) -> Vec<u8> {
    let mut out = varint(field << 3);
    out.extend(varint(value));
    out
}

fn len_field(field: u64, payload: &[u8]) -> Vec<u8> {
    let mut out = varint(field << 3 | 2);
    out.extend(varint(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

fn str_field(field: u64, value: &str) -> Vec<u8> {
    len_field(field, value.as_bytes())
}

// ValueInfoProto { name, type: TypeProto { tensor_type: { elem_type: FLOAT, shape } } }
fn tensor_value_info(name: &str, dims: &[u64]) -> Vec<u8> {
    let shape: Vec<u8> = dims
        .iter()
        .flat_map(|&d| len_field(1, &varint_field(1, d)))
        .collect();
    let mut tensor_type = varint_field(1, 1);
    tensor_type.extend(len_field(2, &shape));
    let type_proto = len_field(1, &tensor_type);

    let mut value_info = str_field(1, name);
    value_info.extend(len_field(2, &type_proto));
    value_info
}

/// Bytes of a valid ONNX model computing `y = Add(x, x)` for `x: f32[1, 4]`.
pub fn add_model_bytes() -> Vec<u8> {
    // NodeProto { input: ["x", "x"], output: ["y"], op_type: "Add" }
    let mut node = str_field(1, "x");
    node.extend(str_field(1, "x"));
    node.extend(str_field(2, "y"));
    node.extend(str_field(4, "Add"));

    // GraphProto { node, name, input, output }
    let mut graph = len_field(1, &node);
    graph.extend(str_field(2, "double"));
    graph.extend(len_field(11, &tensor_value_info("x", &[1, 4])));
    graph.extend(len_field(12, &tensor_value_info("y", &[1, 4])));

    // OperatorSetIdProto { version: 13 } (default domain)
    let opset = varint_field(2, 13);

    // ModelProto { ir_version: 8, graph, opset_import }
    let mut model = varint_field(1, 8);
    model.extend(len_field(7, &graph));
    model.extend(len_field(8, &opset));
    model
}
