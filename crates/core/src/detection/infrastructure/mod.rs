pub mod model_resolver;
pub mod onnx_yolo_locator;
pub mod unavailable_face_locator;
